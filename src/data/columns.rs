//! Каноническая таблица колонок исходного датасета

use serde::{Deserialize, Serialize};

use crate::types::TARGET_COLUMN;

/// Объявленный тип колонки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Target,
}

#[derive(Debug, Clone, Copy)]
pub struct CanonicalColumn {
    pub source: &'static str,
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn column(source: &'static str, name: &'static str, kind: ColumnKind) -> CanonicalColumn {
    CanonicalColumn { source, name, kind }
}

pub const CANONICAL_COLUMNS: [CanonicalColumn; 12] = [
    column("r", "range_km", ColumnKind::Numeric),
    column("m (kg)", "mass_kg", ColumnKind::Numeric),
    column("Mt", "co2_emission_tons", ColumnKind::Numeric),
    column("Ewltp (g/km)", "co2_wltp_g_per_km", ColumnKind::Numeric),
    column("Ft", "fuel_type", ColumnKind::Categorical),
    column("Fm", "fuel_mix", ColumnKind::Categorical),
    column("ec (cm3)", "engine_capacity_cc", ColumnKind::Numeric),
    column("ep (KW)", "engine_power_kw", ColumnKind::Numeric),
    column("z (Wh/km)", "energy_consumption_whpkm", ColumnKind::Numeric),
    column("Erwltp (g/km)", "co2_reduction_wltp_gpkm", ColumnKind::Numeric),
    column("Fuel consumption", TARGET_COLUMN, ColumnKind::Target),
    column("Electric range (km)", "electric_range_km", ColumnKind::Numeric),
];

/// Каноническое имя для заголовка источника. Уже канонические имена
/// возвращаются как есть.
pub fn canonical_name(header: &str) -> Option<&'static str> {
    CANONICAL_COLUMNS
        .iter()
        .find(|c| c.source == header || c.name == header)
        .map(|c| c.name)
}

pub fn kind_of(name: &str) -> Option<ColumnKind> {
    CANONICAL_COLUMNS
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.kind)
}

/// Все колонки, которые обязаны присутствовать после очистки
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    CANONICAL_COLUMNS.iter().map(|c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_and_canonical_headers_resolve() {
        assert_eq!(canonical_name("m (kg)"), Some("mass_kg"));
        assert_eq!(canonical_name("mass_kg"), Some("mass_kg"));
        assert_eq!(canonical_name("Fuel consumption"), Some(TARGET_COLUMN));
        assert_eq!(canonical_name("Country"), None);
    }

    #[test]
    fn kinds_are_declared() {
        assert_eq!(kind_of("fuel_type"), Some(ColumnKind::Categorical));
        assert_eq!(kind_of("mass_kg"), Some(ColumnKind::Numeric));
        assert_eq!(kind_of(TARGET_COLUMN), Some(ColumnKind::Target));
        assert_eq!(required_columns().count(), 12);
    }
}
