use html_tamer::{
    absolutize, balance, decode_html, sterilize, thin, IndexedDocument, SanitizeFlags, ThinFlags,
    ThinSettings,
};
use itertools::Itertools;

const PAGE: &[u8] = b"<html><head>\
    <meta http-equiv=Content-Type content=\"text/html; charset=windows-1252\">\
    <title>Caf\xe9 &amp; Bar</title></head>\
    <body><h1>Menu</h1><p>Cr\xe8me br\xfbl\xe9e <img src=img/creme.png> and more</p>\
    <script>track()</script></body></html>";

const URL: &str = "http://shop.example/menu/";

fn indexed_page() -> IndexedDocument {
    let decoded = decode_html(PAGE, "utf-8").unwrap();

    assert_eq!(decoded.encoding, encoding_rs::WINDOWS_1252);

    IndexedDocument::index(decoded.html, URL)
}

#[test]
fn captured_page_is_indexed() {
    let doc = indexed_page();

    assert_eq!(doc.title(), "Caf\u{e9} & Bar");
    assert_eq!(doc.metadata().charset.as_deref(), Some("windows-1252"));
    assert_eq!(
        doc.resource_urls().iter().map(|info| &info.url).collect_vec(),
        ["http://shop.example/menu/img/creme.png"]
    );
    assert!(doc.anchors().is_empty());
}

#[test]
fn captured_page_becomes_a_snippet() {
    let doc = indexed_page();
    let clean = sterilize(doc.html(), SanitizeFlags::all());

    assert_eq!(
        clean,
        "<h1>Menu</h1><p>Cr\u{e8}me br\u{fb}l\u{e9}e <img src=img/creme.png> and more</p>"
    );

    assert_eq!(
        balance(&clean, 30),
        "<h1>Menu</h1><p>Cr\u{e8}me br\u{fb}l\u{e9}e "
    );

    let thinned = thin(&clean, &ThinSettings::default());

    assert!(thinned.starts_with("<h3>Menu</h3>"), "{thinned:?}");
    assert!(thinned.contains("Cr&egrave;me br&ucirc;l&eacute;e"), "{thinned:?}");
    assert!(!thinned.contains("<img"), "{thinned:?}");
}

#[test]
fn captured_page_is_regenerated_standalone() {
    let html = indexed_page().generate_html();

    assert!(
        html.starts_with("<!-- saved from url=(0025)http://shop.example/menu/ -->\r\n<html><head>"),
        "{html:?}"
    );
    assert!(html.contains("<title>Caf\u{e9} &amp; Bar</title>"), "{html:?}");
    assert!(html.contains("<img src=img/creme.png>"), "{html:?}");
    assert!(!html.contains("<script"), "{html:?}");
    assert!(html.ends_with("</body></html>"), "{html:?}");
}

#[test]
fn fragment_through_every_pass() {
    let html = "<div><h1>Hi</h1><script>alert(1)</script><img src=\"/a.png\"></div>";

    let clean = sterilize(html, SanitizeFlags::all());

    assert_eq!(clean, "<div><h1>Hi</h1><img src=\"/a.png\"></div>");

    let thinned = thin(&clean, &ThinSettings::new(ThinFlags::PRESERVE_IMAGES));

    assert!(thinned.contains("<h3>Hi</h3>"), "{thinned:?}");
    assert!(thinned.contains("<img src=\"/a.png\">"), "{thinned:?}");
    assert!(!thinned.contains("<div"), "{thinned:?}");

    let absolute = absolutize(&clean, "http://e.com/").unwrap();

    assert_eq!(absolute, "<div><h1>Hi</h1><img src=\"http://e.com/a.png\"></div>");
    assert_eq!(balance(&absolute, 22), "<div><h1>Hi</h1></div>");
}
