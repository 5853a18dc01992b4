//! Tables de correspondance statiques (codes éditeurs, pays, types de produit)
//!
//! Les tables sont des tranches `'static` en lecture seule, partagées sans
//! verrou entre les threads.

pub mod microsoft;
pub mod nintendo;
pub mod sega;

/// Table clé → valeur en lecture seule
#[derive(Debug)]
pub struct LookupTable<K: 'static, V: 'static = &'static str> {
    entries: &'static [(K, V)],
}

impl<K: PartialEq + Copy, V: Copy> LookupTable<K, V> {
    pub const fn new(entries: &'static [(K, V)]) -> Self {
        Self { entries }
    }

    /// Première valeur associée à la clé
    pub fn get(&self, key: K) -> Option<V> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    pub fn contains(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Copy> LookupTable<&'static str, V> {
    /// Recherche par texte emprunté
    pub fn get_str(&self, key: &str) -> Option<V> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }
}

/// Noms des mois, indexés à partir de 1
pub static MONTH_NAMES: LookupTable<u32> = LookupTable::new(&[
    (1, "January"),
    (2, "February"),
    (3, "March"),
    (4, "April"),
    (5, "May"),
    (6, "June"),
    (7, "July"),
    (8, "August"),
    (9, "September"),
    (10, "October"),
    (11, "November"),
    (12, "December"),
]);

/// Nom du mois, ou `Unknown (n)` hors de 1..=12
pub fn month_name(month: u32) -> String {
    match MONTH_NAMES.get(month) {
        Some(name) => name.to_string(),
        None => format!("Unknown ({})", month),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_missing() {
        static TABLE: LookupTable<u8> = LookupTable::new(&[(1, "One"), (2, "Two")]);
        assert_eq!(TABLE.get(2), Some("Two"));
        assert_eq!(TABLE.get(3), None);
        assert_eq!(TABLE.len(), 2);
    }

    #[test]
    fn test_str_keys() {
        assert_eq!(nintendo::LICENSEE_CODES.get_str("01"), Some("Nintendo"));
        assert_eq!(nintendo::LICENSEE_CODES.get_str("ZZ"), None);
        assert_eq!(sega::LICENSEES.get_str("T-12"), Some("Capcom"));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(3), "March");
        assert_eq!(month_name(0), "Unknown (0)");
        assert_eq!(month_name(13), "Unknown (13)");
    }
}
