//! Locale-keyed console/log messages.
//!
//! The core only passes a key plus named substitutions; placeholders in the
//! templates look like `{name}`.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Tr,
}

const EN: &[(&str, &str)] = &[
    ("identity.missing", "Default folders cannot be initialized due to missing username."),
    ("folder.missing", "Folder does not exist: {folder}"),
    ("folder.listing", "Files in {folder}: {count}"),
    ("folder.empty", "There are no files in {folder} to delete."),
    ("folder.unreadable", "Error processing the {folder} folder: {error}"),
    ("file.deleted", "File deleted successfully: {file}"),
    ("file.missing", "File does not exist: {file}"),
    ("file.delete_failed", "Error deleting file {file}: {error}"),
    ("tool.opened", "{tool} opened successfully."),
    ("tool.failed", "Error opening {tool}:"),
    ("notice.written", "File created and content written: {file}"),
    ("notice.failed", "Could not write {file}:"),
    ("summary", "{detected} files detected, {deleted} files deleted, {failed} failed across {folders} of {targets} folders."),
    ("version.latest", "Latest version: {latest}"),
    ("version.outdated", "The project is out of date ({current} < {latest})."),
    ("version.current", "The project is up to date."),
    ("version.failed", "Version check failed:"),
];

const TR: &[(&str, &str)] = &[
    ("identity.missing", "Kullanıcı adı bulunamadığı için varsayılan klasörler oluşturulamadı."),
    ("folder.missing", "Klasör mevcut değil: {folder}"),
    ("folder.listing", "{folder} içindeki dosyalar: {count}"),
    ("folder.empty", "{folder} içinde silinecek dosya yok."),
    ("folder.unreadable", "{folder} klasörü işlenirken hata: {error}"),
    ("file.deleted", "Dosya başarıyla silindi: {file}"),
    ("file.missing", "Dosya mevcut değil: {file}"),
    ("file.delete_failed", "{file} silinirken hata: {error}"),
    ("tool.opened", "{tool} başarıyla açıldı."),
    ("tool.failed", "{tool} açılırken hata:"),
    ("notice.written", "Dosya oluşturuldu ve içerik yazıldı: {file}"),
    ("notice.failed", "{file} yazılamadı:"),
    ("summary", "{targets} klasörün {folders} tanesinde {detected} dosya bulundu, {deleted} dosya silindi, {failed} başarısız."),
    ("version.latest", "En son sürüm: {latest}"),
    ("version.outdated", "Proje güncel değil ({current} < {latest})."),
    ("version.current", "Proje güncel."),
    ("version.failed", "Sürüm kontrolü başarısız:"),
];

lazy_static! {
    static ref TABLES: HashMap<Locale, HashMap<&'static str, &'static str>> = {
        let mut tables = HashMap::new();
        tables.insert(Locale::En, EN.iter().copied().collect());
        tables.insert(Locale::Tr, TR.iter().copied().collect());
        tables
    };
}

/// Message lookup for one locale. Missing keys fall back to English, then to
/// the key itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Messages { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn format(&self, key: &str, substitutions: &[(&str, &str)]) -> String {
        let template = TABLES
            .get(&self.locale)
            .and_then(|t| t.get(key))
            .or_else(|| TABLES.get(&Locale::En).and_then(|t| t.get(key)))
            .copied()
            .unwrap_or(key);

        let mut out = template.to_string();
        for (name, value) in substitutions {
            out = out.replace(&format!("{{{}}}", name), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_named_placeholders() {
        let messages = Messages::new(Locale::En);
        assert_eq!(
            messages.format("tool.opened", &[("tool", "MRT")]),
            "MRT opened successfully."
        );
    }

    #[test]
    fn every_english_key_has_a_turkish_entry() {
        let en: Vec<_> = EN.iter().map(|(k, _)| *k).collect();
        let tr: Vec<_> = TR.iter().map(|(k, _)| *k).collect();
        assert_eq!(en, tr);
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let messages = Messages::new(Locale::Tr);
        assert_eq!(messages.format("no.such.key", &[]), "no.such.key");
    }
}
