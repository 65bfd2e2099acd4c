// src/common/text.rs

use std::str::FromStr;

use rust_decimal::Decimal;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Minúsculas, sem acentos (NFD + remoção das marcas combinantes), sem espaços nas pontas.
pub fn normalize(text: &str) -> String {
    text.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Igualdade de nomes ignorando caixa e acentos ("Antônio" == "antonio").
pub fn same_name(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Quebra a consulta em palavras já normalizadas.
pub fn query_words(query: &str) -> Vec<String> {
    query.split_whitespace().map(normalize).collect()
}

/// O texto contém todas as palavras como substring (E lógico, não frase exata).
pub fn contains_all_words(haystack: &str, words: &[String]) -> bool {
    let haystack = normalize(haystack);
    words.iter().all(|word| haystack.contains(word.as_str()))
}

/// Valor numérico guardado como texto. Aceita vírgula como separador decimal.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}
