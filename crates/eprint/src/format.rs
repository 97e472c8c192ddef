//! File naming for downloaded reports.
//!
//! A downloaded PDF is named after its report number and title so that a directory of
//! downloads stays readable and sorts by report:
//!
//! ```
//! use eprint::format;
//!
//! let name = format::pdf_filename(
//!   "2017/1118",
//!   "Solida: A Blockchain Protocol Based on Reconfigurable Byzantine Consensus",
//! );
//! assert_eq!(name, "2017_1118_solida_a_blockchain_protocol_based_on.pdf");
//! ```

/// Title length used by [`pdf_filename`].
const FILENAME_TITLE_LENGTH: usize = 50;

/// Formats a title for use in a filename.
///
/// The title is lowercased, BibTeX braces and punctuation are dropped, and words are
/// joined with underscores. When `max_length` (default 50) would be exceeded, the title
/// is cut at the last whole word that fits.
///
/// ```
/// use eprint::format;
///
/// assert_eq!(format::format_title("Analysis of the Bitcoin {UTXO} set", None), "analysis_of_the_bitcoin_utxo_set");
/// assert_eq!(format::format_title("This Is A Very Long Title Indeed", Some(20)), "this_is_a_very_long");
/// ```
pub fn format_title(title: &str, max_length: Option<usize>) -> String {
  let max_length = max_length.unwrap_or(FILENAME_TITLE_LENGTH);
  let cleaned: String = title
    .to_lowercase()
    .chars()
    .map(|c| if c.is_alphanumeric() || c.is_whitespace() || c == '-' { c } else { ' ' })
    .collect();

  let mut result = String::new();
  for word in cleaned.split_whitespace() {
    let separator = usize::from(!result.is_empty());
    if result.len() + separator + word.len() > max_length {
      break;
    }
    if separator == 1 {
      result.push('_');
    }
    result.push_str(word);
  }
  result
}

/// Filename for the PDF of report `id` (`yyyy/nnnn`) with the given title.
pub fn pdf_filename(id: &str, title: &str) -> String {
  let id = id.replace('/', "_");
  let title = format_title(title, None);
  if title.is_empty() {
    format!("{id}.pdf")
  } else {
    format!("{id}_{title}.pdf")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_title() {
    assert_eq!(format_title("Hello World", None), "hello_world");
    assert_eq!(
      format_title("This Is A Very Long Title Indeed", None),
      "this_is_a_very_long_title_indeed"
    );
    assert_eq!(format_title("This Is A Very Long Title Indeed", Some(20)), "this_is_a_very_long");
    assert_eq!(
      format_title("This Is A Very Long Title Indeed", Some(30)),
      "this_is_a_very_long_title"
    );
    assert_eq!(format_title("No    Extra    Spaces", None), "no_extra_spaces");
    assert_eq!(
      format_title("Lightweight Multiplication in {GF}(2^n)", None),
      "lightweight_multiplication_in_gf_2_n"
    );
    assert_eq!(format_title("Pérez-Solà: a/b", None), "pérez-solà_a_b");
  }

  #[test]
  fn test_pdf_filename() {
    assert_eq!(pdf_filename("1997/006", "Self-Certified Keys"), "1997_006_self-certified_keys.pdf");
    assert_eq!(pdf_filename("2016/119", "{}"), "2016_119.pdf");
  }
}
