//! Feature schema and the single-row record handed to the model.
//!
//! The schema is fixed: every record carries exactly the 26 fields of
//! [`FIELDS`], in table order, whatever the request contained.

use std::fmt;

/// How a request value is coerced for a given field.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    /// Parsed as a floating point number.
    Numeric,
    /// Parsed as an integer count.
    Integer,
    /// Passed through as a label.
    Categorical,
    /// Optional year: falsy or zero means "not applicable" and becomes missing.
    OptionalYear,
}

impl FieldKind {
    /// Whether the model sees this field as a float column.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldKind::Categorical)
    }
}

/// Value substituted when a field is absent from the request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FieldDefault {
    Number(f64),
    Integer(i64),
    Category(&'static str),
    Missing,
}

/// One column of the feature schema.
#[derive(Copy, Clone, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
}

const fn numeric(name: &'static str, default: f64) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Numeric,
        default: FieldDefault::Number(default),
    }
}

const fn integer(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Integer,
        default: FieldDefault::Integer(0),
    }
}

const fn category(name: &'static str, default: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Categorical,
        default: FieldDefault::Category(default),
    }
}

const fn optional_year(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::OptionalYear,
        default: FieldDefault::Missing,
    }
}

/// Literal label used for "no answer" in categorical columns.
pub const NAN_LABEL: &str = "NaN";

/// The salary feature schema, in the column order the model was trained on.
pub const FIELDS: [FieldSpec; 26] = [
    numeric("Total_Experience", 0.0),
    numeric("Total_Experience_in_field_applied", 0.0),
    category("Department", NAN_LABEL),
    category("Role", NAN_LABEL),
    category("Industry", NAN_LABEL),
    category("Organization", NAN_LABEL),
    category("Designation", "fresher"),
    category("Education", "Grad"),
    category("Graduation_Specialization", "Others"),
    category("University_Grad", "Delhi"),
    numeric("Passing_Year_Of_Graduation", 2020.0),
    category("PG_Specialization", NAN_LABEL),
    category("University_PG", NAN_LABEL),
    optional_year("Passing_Year_Of_PG"),
    category("PHD_Specialization", NAN_LABEL),
    category("University_PHD", NAN_LABEL),
    optional_year("Passing_Year_Of_PHD"),
    category("Curent_Location", "Delhi"),
    category("Preferred_location", "Delhi"),
    numeric("Current_CTC", 0.0),
    category("Inhand_Offer", "N"),
    category("Last_Appraisal_Rating", NAN_LABEL),
    integer("No_Of_Companies_worked"),
    integer("Number_of_Publications"),
    integer("Certifications"),
    integer("International_degree_any"),
];

/// Look up a field of the schema by its exact name.
pub fn field(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.name == name)
}

/// A single resolved cell of the feature record.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Integer(i64),
    Category(String),
    /// Value unknown. Distinct from zero and from the `"NaN"` label.
    Missing,
}

impl FeatureValue {
    /// Numeric view used by float splits. `None` means missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) if !n.is_nan() => Some(*n),
            FeatureValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Category(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            FeatureValue::Missing => true,
            FeatureValue::Number(n) => n.is_nan(),
            _ => false,
        }
    }
}

impl From<FieldDefault> for FeatureValue {
    fn from(default: FieldDefault) -> Self {
        match default {
            FieldDefault::Number(n) => FeatureValue::Number(n),
            FieldDefault::Integer(i) => FeatureValue::Integer(i),
            FieldDefault::Category(s) => FeatureValue::Category(s.to_string()),
            FieldDefault::Missing => FeatureValue::Missing,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(n) => write!(f, "{n}"),
            FeatureValue::Integer(i) => write!(f, "{i}"),
            FeatureValue::Category(s) => write!(f, "{s:?}"),
            FeatureValue::Missing => f.write_str("<missing>"),
        }
    }
}

/// Single-row feature table. Always holds one value per schema field.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureRecord {
    values: Vec<FeatureValue>,
}

impl FeatureRecord {
    /// A record where every field holds its documented default.
    pub fn defaults() -> Self {
        Self {
            values: FIELDS.iter().map(|spec| spec.default.into()).collect(),
        }
    }

    /// Value of a field by name. `None` only for names outside the schema.
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        FIELDS
            .iter()
            .position(|spec| spec.name == name)
            .map(|idx| &self.values[idx])
    }

    /// Replace the value of a schema field. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: FeatureValue) {
        if let Some(idx) = FIELDS.iter().position(|spec| spec.name == name) {
            self.values[idx] = value;
        }
    }
}

impl Default for FeatureRecord {
    fn default() -> Self {
        Self::defaults()
    }
}
