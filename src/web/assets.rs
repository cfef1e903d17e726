//! Static page files compiled into the binary.

pub const INDEX_HTML: &str = include_str!("assets/index.html");

pub struct Asset {
    pub content_type: &'static str,
    pub body: &'static str,
}

pub fn lookup(name: &str) -> Option<Asset> {
    let (content_type, body) = match name {
        "styles.css" => ("text/css; charset=utf-8", include_str!("assets/styles.css")),
        "app.js" => (
            "application/javascript; charset=utf-8",
            include_str!("assets/app.js"),
        ),
        _ => return None,
    };
    Some(Asset { content_type, body })
}
