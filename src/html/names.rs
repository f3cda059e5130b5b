//! Name tables derived from the HTML 4 DTD, shared by the rewriting passes.

macro_rules! name_is_one_of {
    ($name:expr, [$($tag:literal),+]) => {{
        let name: &str = $name;

        $(name.eq_ignore_ascii_case($tag))||+
    }};
}

/// Elements whose end tag the balancer must write to keep its output well-formed.
#[inline]
pub fn requires_close(name: &str) -> bool {
    name_is_one_of!(
        name,
        [
            "a", "abbr", "acronym", "address", "applet", "b", "bdo", "big", "blockquote",
            "button", "caption", "center", "cite", "code", "del", "dfn", "dir", "div", "dl",
            "em", "fieldset", "font", "form", "h1", "h2", "h3", "h4", "h5", "h6", "i", "iframe",
            "ins", "kbd", "label", "legend", "map", "menu", "noframes", "noscript", "object",
            "ol", "optgroup", "pre", "q", "s", "samp", "script", "select", "small", "span",
            "strike", "strong", "style", "sub", "sup", "table", "textarea", "title", "tt", "u",
            "ul", "var", "body", "head", "html", "tbody", "ilayer", "frameset", "frame"
        ]
    )
}

/// Elements the sanitizer closes when they are still open at the end of a document.
#[inline]
pub fn requires_end_tag(name: &str) -> bool {
    name_is_one_of!(
        name,
        [
            "a", "b", "blockquote", "cite", "code", "div", "dl", "em", "font", "form", "h1",
            "h2", "h3", "h4", "h5", "h6", "i", "ol", "pre", "select", "span", "strong", "style",
            "table", "textarea", "tt", "ul"
        ]
    )
}

/// Elements that may appear before `<body>` without implying it.
#[inline]
pub fn permitted_above_body(name: &str) -> bool {
    name_is_one_of!(
        name,
        [
            "html", "head", "title", "script", "style", "meta", "link", "object", "base",
            "frame", "frameset", "noscript"
        ]
    )
}

#[inline]
pub fn is_void_element(name: &str) -> bool {
    name_is_one_of!(
        name,
        [
            "area", "base", "br", "col", "embed", "frame", "hr", "img", "input", "link", "meta",
            "param"
        ]
    )
}

/// Attributes whose value is a URI and therefore may smuggle `javascript:`.
#[inline]
pub fn is_uri_attribute(name: &str) -> bool {
    name_is_one_of!(
        name,
        [
            "src",
            "href",
            "datasrc",
            "background",
            "longdesc",
            "usemap",
            "classid",
            "codebase",
            "data",
            "cite",
            "action",
            "profile"
        ]
    )
}

/// Inline event handler attributes (`onclick`, `onload`, ...).
#[inline]
pub fn is_event_handler_attribute(name: &str) -> bool {
    name.len() > 2 && name.as_bytes()[..2].eq_ignore_ascii_case(b"on")
}
