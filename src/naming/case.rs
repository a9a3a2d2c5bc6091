//! Recombining words into a candidate identifier.

use super::keywords::Language;
use super::words::words;

/// Build a candidate identifier from words.
///
/// Every word is title-cased (`ID` becomes `Id`). A leading single lowercase
/// letter is kept as is, since it is a naming prefix such as the `v` in
/// `vSalesPerson`. The result is not yet unique within its table.
pub fn to_identifier<'a, I>(words: I, language: Language) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ident = String::new();

    for (i, word) in words.into_iter().enumerate() {
        if i == 0 && is_prefix_letter(word) {
            ident.push_str(word);
        } else {
            push_title_case(&mut ident, word);
        }
    }

    if ident.is_empty() {
        ident.push('_');
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }

    language.escape(ident)
}

/// Tokenize and case a raw name in one step.
pub fn identifier_for(name: &str, language: Language) -> String {
    to_identifier(words(name), language)
}

fn is_prefix_letter(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_lowercase())
}

fn push_title_case(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.extend(chars.flat_map(char::to_lowercase));
    }
}
