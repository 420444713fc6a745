//! Input classification for free-form record messages
//!
//! Given one text message plus the user's stored password and cookie-mode
//! flag, decide which input format the message is and build the 4-column
//! row to append, or a named rejection. Format detection is purely
//! syntactic: the matchers in [`FORMAT_PRIORITY`] are tried in order and
//! the first one that claims the message wins, so a message satisfying
//! several shapes is classified by priority, not ambiguity-resolved.

use once_cell::sync::Lazy;
use regex::Regex;

/// Cached regex for the auto-cookie marker: first digit run after `c_user=`
static C_USER_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"c_user=(\d+)").expect("Failed to compile c_user regex")
});

/// Cached regex for the Facebook profile link: first digit run after `id=`
static FB_ID_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"id=(\d+)").expect("Failed to compile facebook id regex")
});

/// One spreadsheet row: columns A through D, appended verbatim.
pub type Row = [String; 4];

/// Named reasons a message produces no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Cookie mode is off and no default password has been set
    PasswordRequired,
    /// Text contains `c_user=` but no digits follow it
    CookieUserNotFound,
    /// 3-line Facebook paste without digits after `id=` in the link line
    FacebookIdNotFound,
    /// Pipe split produced neither 3 nor 4 parts
    BadFormat,
}

impl Rejection {
    /// Reply text shown to the user for this rejection.
    pub fn user_message(&self) -> &'static str {
        match self {
            Rejection::PasswordRequired => "❌ Set a password first: /set <password>",
            Rejection::CookieUserNotFound => "❌ c_user not found",
            Rejection::FacebookIdNotFound => "❌ Facebook ID not found",
            Rejection::BadFormat => "❌ Bad format. See /help",
        }
    }
}

/// Everything the classifier needs about one message.
pub struct ClassifyInput<'a> {
    /// Trimmed message text
    pub text: &'a str,
    /// The user's stored default password, if any
    pub password: Option<&'a str>,
    /// Sticky cookie-mode flag
    pub cookie_mode: bool,
}

/// A matcher either claims the input (`Some(row-or-rejection)`) or passes.
type Matcher = fn(&ClassifyInput<'_>) -> Option<Result<Row, Rejection>>;

/// Ordered matcher table, evaluated first-match-wins by [`classify`].
///
/// The order is part of the contract: cookie mode short-circuits every
/// other shape, the password gate fires before any format is examined,
/// and the pipe matcher is total (it always claims whatever is left).
pub const FORMAT_PRIORITY: &[(&str, Matcher)] = &[
    ("cookie-mode", match_cookie_mode),
    ("password-gate", match_password_gate),
    ("auto-cookie", match_auto_cookie),
    ("facebook-paste", match_facebook_paste),
    ("pipe-delimited", match_pipe_delimited),
];

/// Classify one message into a row or a rejection.
pub fn classify(input: &ClassifyInput<'_>) -> Result<Row, Rejection> {
    for (name, matcher) in FORMAT_PRIORITY {
        if let Some(outcome) = matcher(input) {
            log::debug!("classified as {}: row={}", name, outcome.is_ok());
            return outcome;
        }
    }
    // Unreachable while pipe-delimited stays total, but keep the
    // classifier closed over arbitrary matcher tables.
    Err(Rejection::BadFormat)
}

/// Cookie mode: raw text into column A, stored password (or empty) into B.
/// No password precondition; claims every message while the flag is on.
fn match_cookie_mode(input: &ClassifyInput<'_>) -> Option<Result<Row, Rejection>> {
    if !input.cookie_mode {
        return None;
    }
    Some(Ok([
        input.text.to_string(),
        input.password.unwrap_or("").to_string(),
        String::new(),
        String::new(),
    ]))
}

/// All non-cookie formats require a stored password.
fn match_password_gate(input: &ClassifyInput<'_>) -> Option<Result<Row, Rejection>> {
    if input.password.is_none() {
        return Some(Err(Rejection::PasswordRequired));
    }
    None
}

/// Auto-cookie paste: text containing `c_user=<digits>`.
fn match_auto_cookie(input: &ClassifyInput<'_>) -> Option<Result<Row, Rejection>> {
    if !input.text.contains("c_user=") {
        return None;
    }
    let Some(caps) = C_USER_RE.captures(input.text) else {
        return Some(Err(Rejection::CookieUserNotFound));
    };
    Some(Ok([
        caps[1].to_string(),
        input.password.unwrap_or("").to_string(),
        input.text.to_string(),
        String::new(),
    ]))
}

/// Pasted Facebook profile: exactly 3 lines, a facebook.com link on top.
fn match_facebook_paste(input: &ClassifyInput<'_>) -> Option<Result<Row, Rejection>> {
    let lines: Vec<&str> = input.text.lines().collect();
    if lines.len() != 3 || !lines[0].contains("facebook.com") {
        return None;
    }
    let Some(caps) = FB_ID_RE.captures(lines[0]) else {
        return Some(Err(Rejection::FacebookIdNotFound));
    };
    Some(Ok([
        caps[1].to_string(),
        input.password.unwrap_or("").to_string(),
        lines[1].to_string(),
        lines[2].to_string(),
    ]))
}

/// Fallback: pipe-delimited record, 3 parts (stored password fills column
/// B) or 4 parts (supplied password wins for this row only). Total over
/// all remaining inputs.
fn match_pipe_delimited(input: &ClassifyInput<'_>) -> Option<Result<Row, Rejection>> {
    let parts: Vec<&str> = input.text.split('|').collect();
    let stored = input.password.unwrap_or("");
    Some(match parts.as_slice() {
        [id, mail, code] => Ok([id.to_string(), stored.to_string(), mail.to_string(), code.to_string()]),
        [id, pw, mail, code] => Ok([id.to_string(), pw.to_string(), mail.to_string(), code.to_string()]),
        _ => Err(Rejection::BadFormat),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input<'a>(text: &'a str, password: Option<&'a str>, cookie_mode: bool) -> ClassifyInput<'a> {
        ClassifyInput {
            text,
            password,
            cookie_mode,
        }
    }

    fn row(a: &str, b: &str, c: &str, d: &str) -> Row {
        [a.to_string(), b.to_string(), c.to_string(), d.to_string()]
    }

    #[test]
    fn test_format_priority_order_is_fixed() {
        let names: Vec<&str> = FORMAT_PRIORITY.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "cookie-mode",
                "password-gate",
                "auto-cookie",
                "facebook-paste",
                "pipe-delimited"
            ]
        );
    }

    #[test]
    fn test_no_password_rejects() {
        // Scenario 1: no password, cookie mode off
        let result = classify(&input("12345|a@mail.com|999111", None, false));
        assert_eq!(result, Err(Rejection::PasswordRequired));
    }

    #[test]
    fn test_three_part_pipe_uses_stored_password() {
        // Scenario 2: same line after /set hunter2
        let result = classify(&input("12345|a@mail.com|999111", Some("hunter2"), false));
        assert_eq!(result, Ok(row("12345", "hunter2", "a@mail.com", "999111")));
    }

    #[test]
    fn test_four_part_pipe_overrides_stored_password() {
        // Scenario 3: explicit password wins over the stored one
        let result = classify(&input("id1|pw1|mail1|code1", Some("stored"), false));
        assert_eq!(result, Ok(row("id1", "pw1", "mail1", "code1")));
    }

    #[test]
    fn test_auto_cookie_extracts_digit_run() {
        // Scenario 4
        let text = "c_user=778899; xs=abc:def";
        let result = classify(&input(text, Some("pw"), false));
        assert_eq!(result, Ok(row("778899", "pw", text, "")));
    }

    #[test]
    fn test_auto_cookie_takes_first_occurrence() {
        let text = "c_user=111; c_user=222";
        let result = classify(&input(text, Some("pw"), false));
        assert_eq!(result, Ok(row("111", "pw", text, "")));
    }

    #[test]
    fn test_auto_cookie_marker_without_digits_rejects() {
        let result = classify(&input("c_user=; xs=abc", Some("pw"), false));
        assert_eq!(result, Err(Rejection::CookieUserNotFound));
    }

    #[test]
    fn test_facebook_paste() {
        let text = "https://facebook.com/profile.php?id=445566\nuser@mail.com\n111222";
        let result = classify(&input(text, Some("pw"), false));
        assert_eq!(result, Ok(row("445566", "pw", "user@mail.com", "111222")));
    }

    #[test]
    fn test_facebook_paste_without_id_rejects() {
        let text = "https://facebook.com/some.profile\nuser@mail.com\n111222";
        let result = classify(&input(text, Some("pw"), false));
        assert_eq!(result, Err(Rejection::FacebookIdNotFound));
    }

    #[test]
    fn test_facebook_link_with_wrong_line_count_falls_through() {
        // 2 lines only: not the paste format, lands in the pipe matcher
        let text = "https://facebook.com/profile.php?id=445566\nuser@mail.com";
        let result = classify(&input(text, Some("pw"), false));
        assert_eq!(result, Err(Rejection::BadFormat));
    }

    #[test]
    fn test_pipe_rejects_wrong_part_counts() {
        for text in ["just text", "a|b", "a|b|c|d|e", ""] {
            let result = classify(&input(text, Some("pw"), false));
            assert_eq!(result, Err(Rejection::BadFormat), "input: {:?}", text);
        }
    }

    #[test]
    fn test_cookie_mode_wraps_any_text() {
        // Scenario 5, first half
        let result = classify(&input("foo bar baz", None, true));
        assert_eq!(result, Ok(row("foo bar baz", "", "", "")));

        let result = classify(&input("foo bar baz", Some("pw"), true));
        assert_eq!(result, Ok(row("foo bar baz", "pw", "", "")));
    }

    #[test]
    fn test_cookie_mode_short_circuits_other_formats() {
        // Would be an auto-cookie match otherwise; cookie mode wins
        let text = "c_user=778899; xs=abc";
        let result = classify(&input(text, Some("pw"), true));
        assert_eq!(result, Ok(row(text, "pw", "", "")));

        // Would be a 3-part pipe record otherwise
        let result = classify(&input("a|b|c", Some("pw"), true));
        assert_eq!(result, Ok(row("a|b|c", "pw", "", "")));
    }

    #[test]
    fn test_cookie_mode_never_requires_password() {
        // cookieMode(u)=true => classify(u, anyText) != PasswordRequired
        for text in ["foo", "a|b", "c_user=", "x|y|z"] {
            let result = classify(&input(text, None, true));
            assert_ne!(result, Err(Rejection::PasswordRequired), "input: {:?}", text);
        }
    }

    #[test]
    fn test_cookie_mode_off_restores_password_gate() {
        // Scenario 5, second half: after /c off the same text needs a password
        let result = classify(&input("foo bar baz", None, false));
        assert_eq!(result, Err(Rejection::PasswordRequired));
    }

    #[test]
    fn test_auto_cookie_wins_over_pipe_shape() {
        // Contains both the marker and pipes; priority picks auto-cookie
        let text = "sb=x|c_user=42|datr=y";
        let result = classify(&input(text, Some("pw"), false));
        assert_eq!(result, Ok(row("42", "pw", text, "")));
    }
}
