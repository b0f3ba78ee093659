//! Filename sanitization for object keys and staged files.

/// Characters that are unsafe in filenames and object keys.
const DISALLOWED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Map an arbitrary title to a filesystem- and object-key-safe token.
///
/// Every disallowed character, every space, and every non-ASCII
/// character becomes `_`. Total and idempotent; collisions are
/// resolved upstream by timestamp-prefixing the object key, not here.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if !c.is_ascii() || c == ' ' || DISALLOWED.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_disallowed_characters() {
        assert_eq!(sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_replaces_spaces() {
        assert_eq!(sanitize_filename("My Clip.mp4"), "My_Clip.mp4");
    }

    #[test]
    fn test_replaces_non_ascii() {
        assert_eq!(sanitize_filename("café—видео.mp4"), "caf_______.mp4");
    }

    #[test]
    fn test_output_is_ascii_without_disallowed() {
        let inputs = [
            "plain.mp4",
            "über cool/clip?.webm",
            "日本語タイトル",
            "tabs\tand\nnewlines",
            "",
        ];
        for input in inputs {
            let out = sanitize_filename(input);
            assert!(out.is_ascii(), "non-ascii output for {input:?}");
            assert!(!out.contains(' '));
            for c in DISALLOWED {
                assert!(!out.contains(*c), "{c:?} survived in {out:?}");
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let inputs = ["My Clip.mp4", "über/clip", "already_safe.mp4", ""];
        for input in inputs {
            let once = sanitize_filename(input);
            assert_eq!(sanitize_filename(&once), once);
        }
    }
}
