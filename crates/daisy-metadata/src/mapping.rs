use std::path::Path;

use daisy_core::domain::BookDescriptor;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use crate::tag_keys::{TAG_CREATOR, TAG_TITLE, UNKNOWN_AUTHOR};

/// Content of the first `<meta name="{name}" content="...">` in `html`.
///
/// Plain substring scan, no HTML parsing: attribute order and quoting must
/// match exactly. Blank values count as missing.
pub fn find_meta_content<'a>(html: &'a str, name: &str) -> Option<&'a str> {
  let needle = format!("<meta name=\"{name}\" content=\"");
  let start = html.find(&needle)? + needle.len();
  let rest = &html[start..];
  let end = rest.find('"')?;
  Some(rest[..end].trim()).filter(|value| !value.is_empty())
}

/// Decodes the marker document. A BOM wins; otherwise UTF-8, then Windows-1252.
pub fn decode_text(bytes: &[u8]) -> String {
  if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
    return encoding.decode_without_bom_handling(&bytes[bom_len..]).0.into_owned();
  }
  match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
    Some(text) => text.into_owned(),
    None => WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
  }
}

/// Builds the descriptor for `archive` from its marker document, applying the
/// file-name and unknown-author fallbacks.
pub fn describe_book(archive: &Path, ncc: &str) -> BookDescriptor {
  let title = match find_meta_content(ncc, TAG_TITLE) {
    Some(title) => title.to_string(),
    None => archive.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default(),
  };
  let author = find_meta_content(ncc, TAG_CREATOR).unwrap_or(UNKNOWN_AUTHOR);

  BookDescriptor::new(archive, title, author)
}
