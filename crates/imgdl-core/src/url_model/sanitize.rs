//! Basename sanitization.

/// Linux NAME_MAX, leaving room for the longest strategy prefix.
const MAX_BASENAME: usize = 255 - "multiprocessing_".len();

/// Makes a URL basename safe to join onto the output folder.
///
/// Path separators, NUL, and control characters become `_`; everything else is
/// kept as-is so the file keeps the name the server used. Long names are cut
/// on a char boundary.
pub fn sanitize_basename(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c == '\0' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if out.len() > MAX_BASENAME {
        let mut take = MAX_BASENAME;
        while !out.is_char_boundary(take) {
            take -= 1;
        }
        out.truncate(take);
    }
    out
}
