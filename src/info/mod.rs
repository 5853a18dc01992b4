//! Enregistrement de diagnostic produit par les décodeurs
//!
//! Un `InfoRecord` est une suite ordonnée de champs nommés pour un couple
//! (fichier, décodeur). L'ordre d'insertion est conservé pour l'affichage.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::lookup::LookupTable;

/// Valeur brute d'un champ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Unsigned(u64),
    Bytes(Vec<u8>),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    List(Vec<String>),
}

/// Indication de format pour l'affichage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatMode {
    /// Valeur affichée telle quelle
    Plain,

    /// Nombre ou octets en hexadécimal
    Hex,

    /// Taille en octets
    Size,

    /// Code résolu via une table statique; `None` si le code est inconnu
    Lookup(Option<String>),
}

/// Champ nommé d'un enregistrement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoField {
    pub name: String,
    pub value: FieldValue,
    pub format: FormatMode,

    /// Détail technique que l'affichage peut masquer
    pub extra: bool,
}

impl InfoField {
    /// Rendu texte selon l'indication de format
    pub fn display(&self) -> String {
        match &self.format {
            FormatMode::Plain => self.value.to_string(),
            FormatMode::Hex => format_hex(&self.value),
            FormatMode::Size => format_size(&self.value),
            FormatMode::Lookup(Some(name)) => name.clone(),
            FormatMode::Lookup(None) => self.value.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Unsigned(v) => write!(f, "{}", v),
            FieldValue::Bytes(bytes) => write!(f, "{}", hex_string(bytes, " ")),
            FieldValue::Text(text) => write!(f, "{}", text),
            FieldValue::Bool(true) => write!(f, "Yes"),
            FieldValue::Bool(false) => write!(f, "No"),
            FieldValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            FieldValue::DateTime(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S UTC")),
            FieldValue::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<char> for FieldValue {
    fn from(value: char) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(value: $t) -> Self {
                FieldValue::Unsigned(value as u64)
            }
        })*
    };
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(value: $t) -> Self {
                FieldValue::Integer(value as i64)
            }
        })*
    };
}

impl_from_unsigned!(u8, u16, u32, u64);
impl_from_signed!(i16, i32, i64);

/// Enregistrement de diagnostic ordonné
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfoRecord {
    fields: Vec<InfoField>,
}

impl InfoRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute ou remplace un champ
    ///
    /// Un nom déjà présent garde sa position; sa valeur et son format sont
    /// remplacés (la dernière écriture gagne).
    pub fn insert(&mut self, name: &str, value: FieldValue, format: FormatMode, extra: bool) {
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == name) {
            existing.value = value;
            existing.format = format;
            existing.extra = extra;
            return;
        }

        self.fields.push(InfoField {
            name: name.to_string(),
            value,
            format,
            extra,
        });
    }

    pub fn add(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.insert(name, value.into(), FormatMode::Plain, false);
    }

    /// Ajoute un champ technique, masquable à l'affichage
    pub fn add_extra(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.insert(name, value.into(), FormatMode::Plain, true);
    }

    pub fn add_hex(&mut self, name: &str, value: impl Into<FieldValue>, extra: bool) {
        self.insert(name, value.into(), FormatMode::Hex, extra);
    }

    pub fn add_size(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.insert(name, value.into(), FormatMode::Size, false);
    }

    /// Ajoute un code résolu par une table; un code inconnu est conservé tel quel
    pub fn add_lookup<K>(&mut self, name: &str, key: K, table: &LookupTable<K>)
    where
        K: PartialEq + Into<FieldValue> + Copy + 'static,
    {
        let resolved = table.get(key).map(str::to_string);
        self.insert(name, key.into(), FormatMode::Lookup(resolved), false);
    }

    /// Variante de `add_lookup` pour les clés texte (codes éditeur, etc.)
    pub fn add_lookup_str(&mut self, name: &str, key: &str, table: &LookupTable<&'static str>) {
        let resolved = table.get_str(key).map(str::to_string);
        self.insert(name, key.into(), FormatMode::Lookup(resolved), false);
    }

    /// Liste de codes; chaque élément est résolu séparément
    pub fn add_lookup_list<K>(&mut self, name: &str, keys: &[K], table: &LookupTable<K>)
    where
        K: PartialEq + Copy + fmt::Display + 'static,
    {
        let items = keys
            .iter()
            .map(|&key| match table.get(key) {
                Some(resolved) => resolved.to_string(),
                None => key.to_string(),
            })
            .collect();
        self.insert(name, FieldValue::List(items), FormatMode::Plain, false);
    }

    /// Taille associée à un code, affichée comme une taille si le code est connu
    pub fn add_size_lookup<K>(&mut self, name: &str, key: K, table: &LookupTable<K, u64>)
    where
        K: PartialEq + Into<FieldValue> + Copy + 'static,
    {
        match table.get(key) {
            Some(size) => self.insert(name, FieldValue::Unsigned(size), FormatMode::Size, false),
            None => self.insert(name, key.into(), FormatMode::Lookup(None), false),
        }
    }

    pub fn get(&self, name: &str) -> Option<&InfoField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.get(name).map(|f| &f.value)
    }

    pub fn fields(&self) -> &[InfoField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn hex_string(bytes: &[u8], separator: &str) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(separator)
}

fn format_hex(value: &FieldValue) -> String {
    match value {
        FieldValue::Unsigned(v) => format!("0x{:X}", v),
        FieldValue::Integer(v) if *v < 0 => format!("-0x{:X}", v.unsigned_abs()),
        FieldValue::Integer(v) => format!("0x{:X}", v),
        FieldValue::Bytes(bytes) => hex_string(bytes, " "),
        other => other.to_string(),
    }
}

fn format_size(value: &FieldValue) -> String {
    let bytes = match value {
        FieldValue::Unsigned(v) => *v,
        FieldValue::Integer(v) if *v >= 0 => *v as u64,
        other => return other.to_string(),
    };

    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} bytes", bytes);
    }

    let mut scaled = bytes as f64 / 1024.0;
    let mut unit = 0;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    if scaled.fract() == 0.0 {
        format!("{} {} ({} bytes)", scaled as u64, UNITS[unit], bytes)
    } else {
        format!("{:.2} {} ({} bytes)", scaled, UNITS[unit], bytes)
    }
}
