//! Unit registry and conversion engine.
//!
//! Every category has an implicit base unit (scale factor 1); conversion is a
//! multiply-divide through the base. Temperature is the one affine special
//! case and pivots through Celsius.

use crate::shared::error::ConvertError;
use crate::shared::types::UnitDto;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Unit categories for type-safe conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Length,
    Weight,
    Temperature,
    Time,
    Speed,
    Data,
    Energy,
    Area,
    Currency,
}

impl Category {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "length" => Some(Category::Length),
            "weight" => Some(Category::Weight),
            "temperature" => Some(Category::Temperature),
            "time" => Some(Category::Time),
            "speed" => Some(Category::Speed),
            "data" => Some(Category::Data),
            "energy" => Some(Category::Energy),
            "area" => Some(Category::Area),
            "currency" => Some(Category::Currency),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Length => "length",
            Category::Weight => "weight",
            Category::Temperature => "temperature",
            Category::Time => "time",
            Category::Speed => "speed",
            Category::Data => "data",
            Category::Energy => "energy",
            Category::Area => "area",
            Category::Currency => "currency",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Currency,
            Category::Length,
            Category::Weight,
            Category::Temperature,
            Category::Time,
            Category::Speed,
            Category::Data,
            Category::Energy,
            Category::Area,
        ]
    }
}

/// Unit definition with its scale factor to the category base unit.
#[derive(Debug, Clone)]
pub struct UnitDef {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub to_base: f64,
    pub category: Category,
}

/// Static unit table. Base units carry a factor of 1; temperature factors are
/// placeholders since that category converts through the Celsius pivot.
static UNITS: &[UnitDef] = &[
    // Length (base: meter)
    UnitDef { id: "m", name: "Meter", symbol: "m", to_base: 1.0, category: Category::Length },
    UnitDef { id: "km", name: "Kilometer", symbol: "km", to_base: 1000.0, category: Category::Length },
    UnitDef { id: "cm", name: "Centimeter", symbol: "cm", to_base: 0.01, category: Category::Length },
    UnitDef { id: "mm", name: "Millimeter", symbol: "mm", to_base: 0.001, category: Category::Length },
    UnitDef { id: "ft", name: "Foot", symbol: "ft", to_base: 0.3048, category: Category::Length },
    UnitDef { id: "in", name: "Inch", symbol: "in", to_base: 0.0254, category: Category::Length },
    UnitDef { id: "yd", name: "Yard", symbol: "yd", to_base: 0.9144, category: Category::Length },
    UnitDef { id: "mi", name: "Mile", symbol: "mi", to_base: 1609.344, category: Category::Length },
    UnitDef { id: "nmi", name: "Nautical mile", symbol: "nmi", to_base: 1852.0, category: Category::Length },
    // Weight (base: kilogram)
    UnitDef { id: "kg", name: "Kilogram", symbol: "kg", to_base: 1.0, category: Category::Weight },
    UnitDef { id: "g", name: "Gram", symbol: "g", to_base: 0.001, category: Category::Weight },
    UnitDef { id: "mg", name: "Milligram", symbol: "mg", to_base: 0.000001, category: Category::Weight },
    UnitDef { id: "lb", name: "Pound", symbol: "lb", to_base: 0.453592, category: Category::Weight },
    UnitDef { id: "oz", name: "Ounce", symbol: "oz", to_base: 0.0283495, category: Category::Weight },
    UnitDef { id: "t", name: "Ton", symbol: "t", to_base: 1000.0, category: Category::Weight },
    UnitDef { id: "st", name: "Stone", symbol: "st", to_base: 6.35029, category: Category::Weight },
    // Temperature (affine, converted via Celsius)
    UnitDef { id: "c", name: "Celsius", symbol: "°C", to_base: 1.0, category: Category::Temperature },
    UnitDef { id: "f", name: "Fahrenheit", symbol: "°F", to_base: 1.0, category: Category::Temperature },
    UnitDef { id: "k", name: "Kelvin", symbol: "K", to_base: 1.0, category: Category::Temperature },
    // Time (base: second)
    UnitDef { id: "s", name: "Second", symbol: "s", to_base: 1.0, category: Category::Time },
    UnitDef { id: "min", name: "Minute", symbol: "min", to_base: 60.0, category: Category::Time },
    UnitDef { id: "h", name: "Hour", symbol: "h", to_base: 3600.0, category: Category::Time },
    UnitDef { id: "d", name: "Day", symbol: "d", to_base: 86400.0, category: Category::Time },
    UnitDef { id: "w", name: "Week", symbol: "wk", to_base: 604800.0, category: Category::Time },
    UnitDef { id: "month", name: "Month", symbol: "mo", to_base: 2629746.0, category: Category::Time },
    UnitDef { id: "y", name: "Year", symbol: "yr", to_base: 31556952.0, category: Category::Time },
    // Speed (base: meter/second)
    UnitDef { id: "mps", name: "Meter per second", symbol: "m/s", to_base: 1.0, category: Category::Speed },
    UnitDef { id: "kmh", name: "Kilometer per hour", symbol: "km/h", to_base: 0.277778, category: Category::Speed },
    UnitDef { id: "mph", name: "Mile per hour", symbol: "mph", to_base: 0.44704, category: Category::Speed },
    UnitDef { id: "fps", name: "Foot per second", symbol: "ft/s", to_base: 0.3048, category: Category::Speed },
    UnitDef { id: "knot", name: "Knot", symbol: "kn", to_base: 0.514444, category: Category::Speed },
    // Data (base: byte)
    UnitDef { id: "bit", name: "Bit", symbol: "bit", to_base: 0.125, category: Category::Data },
    UnitDef { id: "byte", name: "Byte", symbol: "B", to_base: 1.0, category: Category::Data },
    UnitDef { id: "kb", name: "Kilobyte", symbol: "KB", to_base: 1024.0, category: Category::Data },
    UnitDef { id: "mb", name: "Megabyte", symbol: "MB", to_base: 1048576.0, category: Category::Data },
    UnitDef { id: "gb", name: "Gigabyte", symbol: "GB", to_base: 1073741824.0, category: Category::Data },
    UnitDef { id: "tb", name: "Terabyte", symbol: "TB", to_base: 1099511627776.0, category: Category::Data },
    UnitDef { id: "pb", name: "Petabyte", symbol: "PB", to_base: 1125899906842624.0, category: Category::Data },
    // Energy (base: joule)
    UnitDef { id: "j", name: "Joule", symbol: "J", to_base: 1.0, category: Category::Energy },
    UnitDef { id: "kj", name: "Kilojoule", symbol: "kJ", to_base: 1000.0, category: Category::Energy },
    UnitDef { id: "cal", name: "Calorie", symbol: "cal", to_base: 4.184, category: Category::Energy },
    UnitDef { id: "kcal", name: "Kilocalorie", symbol: "kcal", to_base: 4184.0, category: Category::Energy },
    UnitDef { id: "kwh", name: "Kilowatt-hour", symbol: "kWh", to_base: 3600000.0, category: Category::Energy },
    UnitDef { id: "btu", name: "BTU", symbol: "BTU", to_base: 1055.06, category: Category::Energy },
    // Area (base: square meter)
    UnitDef { id: "m2", name: "Square meter", symbol: "m²", to_base: 1.0, category: Category::Area },
    UnitDef { id: "km2", name: "Square kilometer", symbol: "km²", to_base: 1000000.0, category: Category::Area },
    UnitDef { id: "cm2", name: "Square centimeter", symbol: "cm²", to_base: 0.0001, category: Category::Area },
    UnitDef { id: "ft2", name: "Square foot", symbol: "ft²", to_base: 0.092903, category: Category::Area },
    UnitDef { id: "in2", name: "Square inch", symbol: "in²", to_base: 0.00064516, category: Category::Area },
    UnitDef { id: "ha", name: "Hectare", symbol: "ha", to_base: 10000.0, category: Category::Area },
    UnitDef { id: "acre", name: "Acre", symbol: "acre", to_base: 4046.86, category: Category::Area },
];

/// Registry keyed by unit id, built once at startup.
static UNIT_REGISTRY: Lazy<HashMap<&'static str, &'static UnitDef>> =
    Lazy::new(|| UNITS.iter().map(|def| (def.id, def)).collect());

fn lookup(unit: &str) -> Result<&'static UnitDef, ConvertError> {
    UNIT_REGISTRY
        .get(unit)
        .copied()
        .ok_or_else(|| ConvertError::UnknownUnit(unit.to_string()))
}

/// Convert a value between two units of the same category.
///
/// Identity conversions return the input exactly, skipping the float
/// round-trip through the base unit. No rounding is applied; display
/// precision belongs to the caller.
pub fn convert_value(
    value: f64,
    from_unit: &str,
    to_unit: &str,
    category: &str,
) -> Result<f64, ConvertError> {
    if from_unit == to_unit {
        return Ok(value);
    }

    let category = Category::from_id(category)
        .ok_or_else(|| ConvertError::UnknownCategory(category.to_string()))?;

    if category == Category::Temperature {
        return convert_temperature(value, from_unit, to_unit);
    }

    let from_def = lookup(from_unit)?;
    let to_def = lookup(to_unit)?;

    if from_def.category != to_def.category {
        return Err(ConvertError::CategoryMismatch {
            from: from_unit.to_string(),
            to: to_unit.to_string(),
        });
    }

    Ok(value * from_def.to_base / to_def.to_base)
}

/// Affine temperature conversion through a Celsius pivot.
fn convert_temperature(value: f64, from_unit: &str, to_unit: &str) -> Result<f64, ConvertError> {
    let celsius = match from_unit {
        "c" => value,
        "f" => (value - 32.0) * 5.0 / 9.0,
        "k" => value - 273.15,
        _ => return Err(ConvertError::UnknownUnit(from_unit.to_string())),
    };

    match to_unit {
        "c" => Ok(celsius),
        "f" => Ok(celsius * 9.0 / 5.0 + 32.0),
        "k" => Ok(celsius + 273.15),
        _ => Err(ConvertError::UnknownUnit(to_unit.to_string())),
    }
}

/// All registered units, for the listing endpoint.
pub fn all_units() -> Vec<UnitDto> {
    let mut units: Vec<UnitDto> = UNITS
        .iter()
        .map(|def| UnitDto {
            id: def.id.to_string(),
            name: def.name.to_string(),
            symbol: def.symbol.to_string(),
            category: def.category.as_str().to_string(),
        })
        .collect();

    units.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
    units
}

/// Units belonging to one category.
pub fn units_for_category(category: Category) -> Vec<&'static UnitDef> {
    UNITS.iter().filter(|def| def.category == category).collect()
}
