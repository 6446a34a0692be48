use std::sync::LazyLock;

use regex::Regex;

static ABSOLUTE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid regex"));

static API_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/api/?$").expect("valid regex"));

static YOUTUBE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("valid regex")
});

/// Strips a trailing `/api` or `/api/` from the configured base url.
pub fn api_origin(base_url: &str) -> String {
    API_SUFFIX_RE.replace(base_url, "").into_owned()
}

/// Resolves a media path returned by the API against the site origin.
///
/// Already-absolute urls come back unchanged and root-relative paths get the
/// origin prepended. Any other relative form is returned trimmed but
/// otherwise untouched, which keeps the function idempotent.
pub fn to_absolute_url(origin: &str, url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if ABSOLUTE_URL_RE.is_match(trimmed) {
        return trimmed.to_string();
    }
    if trimmed.starts_with('/') {
        return format!("{origin}{trimmed}");
    }
    trimmed.to_string()
}

/// Maps a broadcast link to something an embedded player can load.
pub fn video_embed_url(url: &str) -> String {
    let clean = url.trim();

    if clean.contains("youtube.com") || clean.contains("youtu.be") {
        if let Some(video_id) = YOUTUBE_ID_RE
            .captures(clean)
            .and_then(|captures| captures.get(1))
        {
            return format!(
                "https://www.youtube.com/embed/{}?autoplay=0&controls=1",
                video_id.as_str()
            );
        }
    }

    if clean.contains("facebook.com") {
        return format!(
            "https://www.facebook.com/plugins/video.php?href={}&show_text=false&autoplay=false",
            encode_uri_component(clean)
        );
    }

    clean.to_string()
}

/// Percent-encodes like `encodeURIComponent`, which keeps `!'()*` literal.
fn encode_uri_component(value: &str) -> String {
    let mut encoded = urlencoding::encode(value).into_owned();
    let marks = [("%21", "!"), ("%27", "'"), ("%28", "("), ("%29", ")"), ("%2A", "*")];
    for (escape, literal) in marks {
        encoded = encoded.replace(escape, literal);
    }
    encoded
}
