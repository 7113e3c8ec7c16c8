/// Canonicize a file name for fuzzy comparison.
///
/// Lowercases, then folds visually confusable glyphs onto one digit each:
/// `i l 1 -> 1`, `o 0 -> 0`, `s 5 -> 5`, `z 2 -> 2`, `g 6 -> 6`, `b 8 -> 8`.
pub fn normalize(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'i' | 'l' | '1' => '1',
            'o' | '0' => '0',
            's' | '5' => '5',
            'z' | '2' => '2',
            'g' | '6' => '6',
            'b' | '8' => '8',
            other => other,
        })
        .collect()
}
