/// Marker appended to entities whose archetype could not be found when the
/// map was imported.
const NOT_FOUND_MARKER: &str = " (not found)";

/// Remove the `.001`-style suffix the editor appends to duplicate names.
///
/// Only a trailing dot followed by exactly three digits is stripped.
pub fn remove_number_suffix(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.len() < 4 {
        return name;
    }
    let (head, tail) = bytes.split_at(bytes.len() - 4);
    if tail[0] == b'.' && tail[1..].iter().all(u8::is_ascii_digit) {
        // The split point is ASCII, so it is a char boundary.
        &name[..head.len()]
    } else {
        name
    }
}

pub fn strip_not_found_marker(name: &str) -> String {
    name.replace(NOT_FOUND_MARKER, "")
}

/// Canonical archetype name for an entity node: lowercase, without the
/// import marker, without the duplicate suffix.
pub fn archetype_name(node_name: &str) -> String {
    let cleaned = strip_not_found_marker(&node_name.to_lowercase());
    remove_number_suffix(&cleaned).to_string()
}
