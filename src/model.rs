//! Data structures describing a product configuration.
//!
//! [`ConfigurationRecord`] is the flat, serialization-friendly snapshot that gets rendered into
//! the summary document. The JSON field names match the files written by
//! [`crate::export::export_configuration`], so records round-trip through disk unchanged.
//!
//! [`Selection`] and [`VariantSet`] model the live configurator state the record is taken
//! from: each set holds an ordered list of options and the index of the chosen one.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Name used for environment and camera when nothing was selected.
pub const DEFAULT_SELECTION_NAME: &str = "Default";

/// Separator between a variant set's name and its selected option.
pub const SELECTION_PATH_SEPARATOR: &str = " > ";

/// Snapshot of a configuration that can be rendered into a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    /// Free-form configuration name. May be empty.
    #[serde(rename = "ConfigurationName")]
    pub name: String,
    /// Display timestamp. Never parsed.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    /// Selection paths such as `"Paint > Red"`, in display order.
    #[serde(
        rename = "SelectedVariants",
        default,
        deserialize_with = "deserialize_string_entries"
    )]
    pub variants: Vec<String>,
    /// Selected environment.
    #[serde(rename = "SelectedEnvironment")]
    pub environment: String,
    /// Selected camera.
    #[serde(rename = "SelectedCamera")]
    pub camera: String,
}

/// Keeps the string entries of the variant array and drops anything else.
fn deserialize_string_entries<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            Value::String(text) => Some(text),
            _ => None,
        })
        .collect())
}

impl ConfigurationRecord {
    /// Creates a record with the given name, an empty timestamp and default selections.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timestamp: String::new(),
            variants: Vec::new(),
            environment: DEFAULT_SELECTION_NAME.to_owned(),
            camera: DEFAULT_SELECTION_NAME.to_owned(),
        }
    }

    /// Sets the timestamp and returns the updated record.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Appends a variant entry and returns the updated record.
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variants.push(variant.into());
        self
    }

    /// Extends the variant list and returns the updated record.
    pub fn with_variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variants.extend(variants.into_iter().map(Into::into));
        self
    }

    /// Sets the environment and returns the updated record.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Sets the camera and returns the updated record.
    pub fn with_camera(mut self, camera: impl Into<String>) -> Self {
        self.camera = camera.into();
        self
    }

    /// Replaces an empty name with `fallback`.
    pub fn with_name_fallback(mut self, fallback: &str) -> Self {
        if self.name.is_empty() {
            self.name = fallback.to_owned();
        }
        self
    }

    /// Builds a record from live selections.
    ///
    /// Every set whose selection resolves contributes one `"Set > Option"` entry, in set order.
    /// Sets with an out-of-range index are skipped. The environment and camera are the selected
    /// options of `environment` and `camera`, or [`DEFAULT_SELECTION_NAME`] when they do not
    /// resolve.
    pub fn from_selections(
        name: impl Into<String>,
        timestamp: impl Into<String>,
        sets: &[VariantSet],
        environment: Option<&Selection<String>>,
        camera: Option<&Selection<String>>,
    ) -> Self {
        let variants = sets.iter().filter_map(VariantSet::selection_path);

        Self::new(name)
            .with_timestamp(timestamp)
            .with_variants(variants)
            .with_environment(selected_or_default(environment))
            .with_camera(selected_or_default(camera))
    }
}

fn selected_or_default(selection: Option<&Selection<String>>) -> String {
    selection
        .and_then(Selection::selected)
        .cloned()
        .unwrap_or_else(|| DEFAULT_SELECTION_NAME.to_owned())
}

/// An ordered list of options together with the index of the chosen one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection<T> {
    options: Vec<T>,
    selected_index: i64,
}

impl<T> Selection<T> {
    /// Creates a selection over `options` pointing at `selected_index`.
    ///
    /// The index is not validated here; [`Selection::selected`] returns `None` when it does not
    /// point at an option.
    pub fn new(options: impl Into<Vec<T>>, selected_index: i64) -> Self {
        Self {
            options: options.into(),
            selected_index,
        }
    }

    /// Returns all options.
    pub fn options(&self) -> &[T] {
        &self.options
    }

    /// Returns the raw selected index.
    pub fn selected_index(&self) -> i64 {
        self.selected_index
    }

    /// Moves the selection and returns the updated value.
    pub fn with_selected_index(mut self, selected_index: i64) -> Self {
        self.selected_index = selected_index;
        self
    }

    /// Returns the selected option, if the index is in range.
    pub fn selected(&self) -> Option<&T> {
        usize::try_from(self.selected_index)
            .ok()
            .and_then(|index| self.options.get(index))
    }
}

/// A named group of mutually exclusive options, e.g. the paint colors of a product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSet {
    name: String,
    selection: Selection<String>,
}

impl VariantSet {
    /// Creates a named variant set.
    pub fn new(name: impl Into<String>, selection: Selection<String>) -> Self {
        Self {
            name: name.into(),
            selection,
        }
    }

    /// Returns the display name of the set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the set's options and selected index.
    pub fn selection(&self) -> &Selection<String> {
        &self.selection
    }

    /// `"Set > Option"` for the selected option, if any.
    pub fn selection_path(&self) -> Option<String> {
        self.selection
            .selected()
            .map(|option| format!("{}{}{}", self.name, SELECTION_PATH_SEPARATOR, option))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn decodes_json_field_names() {
        let json = r#"{
            "ConfigurationName": "Roadster",
            "Timestamp": "2024-05-01_10-00-00",
            "SelectedVariants": ["Paint > Red", 7, null, "Wheels > Sport"],
            "SelectedEnvironment": "Studio",
            "SelectedCamera": "Front"
        }"#;

        let record: ConfigurationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "Roadster");
        assert_eq!(record.variants, vec!["Paint > Red", "Wheels > Sport"]);
        assert_eq!(record.environment, "Studio");
        assert_eq!(record.camera, "Front");
    }

    #[test]
    fn missing_variants_decode_as_empty() {
        let json = r#"{"ConfigurationName":"","Timestamp":"","SelectedEnvironment":"","SelectedCamera":""}"#;
        let record: ConfigurationRecord = serde_json::from_str(json).unwrap();
        assert!(record.variants.is_empty());
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let json = r#"{"ConfigurationName":"x","Timestamp":"","SelectedEnvironment":""}"#;
        assert!(serde_json::from_str::<ConfigurationRecord>(json).is_err());
    }

    #[test]
    fn selection_rejects_out_of_range_indices() {
        let selection = Selection::new(options(&["A", "B"]), 1);
        assert_eq!(selection.selected().map(String::as_str), Some("B"));
        assert!(selection.clone().with_selected_index(2).selected().is_none());
        assert!(selection.with_selected_index(-1).selected().is_none());
    }

    #[test]
    fn from_selections_keeps_set_order_and_skips_unresolved_sets() {
        let sets = vec![
            VariantSet::new("Paint", Selection::new(options(&["Red", "Blue"]), 1)),
            VariantSet::new("Trim", Selection::new(options(&["Chrome"]), 5)),
            VariantSet::new("Wheels", Selection::new(options(&["Sport"]), 0)),
        ];
        let environment = Selection::new(options(&["Studio", "Desert"]), 1);
        let camera = Selection::new(options(&["Front", "Interior"]), 1);

        let record = ConfigurationRecord::from_selections(
            "Roadster",
            "now",
            &sets,
            Some(&environment),
            Some(&camera),
        );

        assert_eq!(record.variants, vec!["Paint > Blue", "Wheels > Sport"]);
        assert_eq!(record.environment, "Desert");
        assert_eq!(record.camera, "Interior");
    }

    #[test]
    fn unresolved_environment_and_camera_fall_back_to_default() {
        let camera = Selection::new(options(&["Front"]), -1);

        let record =
            ConfigurationRecord::from_selections("Roadster", "now", &[], None, Some(&camera));

        assert!(record.variants.is_empty());
        assert_eq!(record.environment, DEFAULT_SELECTION_NAME);
        assert_eq!(record.camera, DEFAULT_SELECTION_NAME);
    }

    #[test]
    fn name_fallback_only_replaces_empty_names() {
        assert_eq!(
            ConfigurationRecord::new("").with_name_fallback("Fallback").name,
            "Fallback"
        );
        assert_eq!(
            ConfigurationRecord::new("Kept").with_name_fallback("Fallback").name,
            "Kept"
        );
    }
}
