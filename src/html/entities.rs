use hashbrown::HashMap;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Latin-1 supplement names, indexed by `code point - 160`.
static LATIN1_NAMES: [&str; 96] = [
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect", "uml", "copy", "ordf",
    "laquo", "not", "shy", "reg", "macr", "deg", "plusmn", "sup2", "sup3", "acute", "micro",
    "para", "middot", "cedil", "sup1", "ordm", "raquo", "frac14", "frac12", "frac34", "iquest",
    "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig", "Ccedil", "Egrave",
    "Eacute", "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml", "ETH", "Ntilde", "Ograve",
    "Oacute", "Ocirc", "Otilde", "Ouml", "times", "Oslash", "Ugrave", "Uacute", "Ucirc", "Uuml",
    "Yacute", "THORN", "szlig", "agrave", "aacute", "acirc", "atilde", "auml", "aring", "aelig",
    "ccedil", "egrave", "eacute", "ecirc", "euml", "igrave", "iacute", "icirc", "iuml", "eth",
    "ntilde", "ograve", "oacute", "ocirc", "otilde", "ouml", "divide", "oslash", "ugrave",
    "uacute", "ucirc", "uuml", "yacute", "thorn", "yuml",
];

static OTHER_ENTITIES: [(&str, u32); 156] = [
    ("quot", 34),
    ("amp", 38),
    ("lt", 60),
    ("gt", 62),
    ("OElig", 338),
    ("oelig", 339),
    ("Scaron", 352),
    ("scaron", 353),
    ("Yuml", 376),
    ("fnof", 402),
    ("circ", 710),
    ("tilde", 732),
    ("Alpha", 913),
    ("Beta", 914),
    ("Gamma", 915),
    ("Delta", 916),
    ("Epsilon", 917),
    ("Zeta", 918),
    ("Eta", 919),
    ("Theta", 920),
    ("Iota", 921),
    ("Kappa", 922),
    ("Lambda", 923),
    ("Mu", 924),
    ("Nu", 925),
    ("Xi", 926),
    ("Omicron", 927),
    ("Pi", 928),
    ("Rho", 929),
    ("Sigma", 931),
    ("Tau", 932),
    ("Upsilon", 933),
    ("Phi", 934),
    ("Chi", 935),
    ("Psi", 936),
    ("Omega", 937),
    ("alpha", 945),
    ("beta", 946),
    ("gamma", 947),
    ("delta", 948),
    ("epsilon", 949),
    ("zeta", 950),
    ("eta", 951),
    ("theta", 952),
    ("iota", 953),
    ("kappa", 954),
    ("lambda", 955),
    ("mu", 956),
    ("nu", 957),
    ("xi", 958),
    ("omicron", 959),
    ("pi", 960),
    ("rho", 961),
    ("sigmaf", 962),
    ("sigma", 963),
    ("tau", 964),
    ("upsilon", 965),
    ("phi", 966),
    ("chi", 967),
    ("psi", 968),
    ("omega", 969),
    ("thetasym", 977),
    ("upsih", 978),
    ("piv", 982),
    ("ensp", 8194),
    ("emsp", 8195),
    ("thinsp", 8201),
    ("zwnj", 8204),
    ("zwj", 8205),
    ("lrm", 8206),
    ("rlm", 8207),
    ("ndash", 8211),
    ("mdash", 8212),
    ("lsquo", 8216),
    ("rsquo", 8217),
    ("sbquo", 8218),
    ("ldquo", 8220),
    ("rdquo", 8221),
    ("bdquo", 8222),
    ("dagger", 8224),
    ("Dagger", 8225),
    ("bull", 8226),
    ("hellip", 8230),
    ("permil", 8240),
    ("prime", 8242),
    ("Prime", 8243),
    ("lsaquo", 8249),
    ("rsaquo", 8250),
    ("oline", 8254),
    ("frasl", 8260),
    ("euro", 8364),
    ("image", 8465),
    ("weierp", 8472),
    ("real", 8476),
    ("trade", 8482),
    ("alefsym", 8501),
    ("larr", 8592),
    ("uarr", 8593),
    ("rarr", 8594),
    ("darr", 8595),
    ("harr", 8596),
    ("crarr", 8629),
    ("lArr", 8656),
    ("uArr", 8657),
    ("rArr", 8658),
    ("dArr", 8659),
    ("hArr", 8660),
    ("forall", 8704),
    ("part", 8706),
    ("exist", 8707),
    ("empty", 8709),
    ("nabla", 8711),
    ("isin", 8712),
    ("notin", 8713),
    ("ni", 8715),
    ("prod", 8719),
    ("sum", 8721),
    ("minus", 8722),
    ("lowast", 8727),
    ("radic", 8730),
    ("prop", 8733),
    ("infin", 8734),
    ("ang", 8736),
    ("and", 8743),
    ("or", 8744),
    ("cap", 8745),
    ("cup", 8746),
    ("int", 8747),
    ("there4", 8756),
    ("sim", 8764),
    ("cong", 8773),
    ("asymp", 8776),
    ("ne", 8800),
    ("equiv", 8801),
    ("le", 8804),
    ("ge", 8805),
    ("sub", 8834),
    ("sup", 8835),
    ("nsub", 8836),
    ("sube", 8838),
    ("supe", 8839),
    ("oplus", 8853),
    ("otimes", 8855),
    ("perp", 8869),
    ("sdot", 8901),
    ("lceil", 8968),
    ("rceil", 8969),
    ("lfloor", 8970),
    ("rfloor", 8971),
    ("lang", 9001),
    ("rang", 9002),
    ("loz", 9674),
    ("spades", 9824),
    ("clubs", 9827),
    ("hearts", 9829),
    ("diams", 9830),
];

struct EntityTable {
    by_name: HashMap<&'static str, char>,
    by_char: HashMap<char, &'static str>,
}

static ENTITIES: LazyLock<EntityTable> = LazyLock::new(|| {
    let latin1 = LATIN1_NAMES
        .iter()
        .zip(160u32..)
        .map(|(&name, code)| (name, code));

    let mut by_name = HashMap::new();
    let mut by_char = HashMap::new();

    for (name, code) in latin1.chain(OTHER_ENTITIES.iter().copied()) {
        if let Some(ch) = char::from_u32(code) {
            by_name.insert(name, ch);
            by_char.insert(ch, name);
        }
    }

    EntityTable { by_name, by_char }
});

#[inline]
fn is_latin1_name(name: &str) -> bool {
    LATIN1_NAMES.contains(&name)
}

/// Where the text being unescaped came from. Attribute values only honour
/// named references that are properly terminated with `;`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnescapeMode {
    Text,
    Attribute,
}

/// Replaces every character that has a named HTML 4 entity with `&name;`.
pub fn escape(text: &str) -> Cow<'_, str> {
    let table = &*ENTITIES;

    let Some(first) = text.find(|c| table.by_char.contains_key(&c)) else {
        return Cow::Borrowed(text);
    };

    let mut escaped = String::with_capacity(text.len() + 8);

    escaped.push_str(&text[..first]);

    for ch in text[first..].chars() {
        match table.by_char.get(&ch) {
            Some(name) => {
                escaped.push('&');
                escaped.push_str(name);
                escaped.push(';');
            }
            None => escaped.push(ch),
        }
    }

    Cow::Owned(escaped)
}

/// Decodes numeric and named character references. Malformed or unknown
/// references are kept verbatim.
pub fn unescape(text: &str, mode: UnescapeMode) -> Cow<'_, str> {
    if memchr::memchr(b'&', text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = memchr::memchr(b'&', rest.as_bytes()) {
        decoded.push_str(&rest[..amp]);
        rest = &rest[amp..];

        match decode_reference(rest, mode) {
            Some((ch, consumed)) => {
                decoded.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }

    decoded.push_str(rest);

    Cow::Owned(decoded)
}

/// Decodes a reference at the start of `input` (which begins with `&`),
/// returning the character and the number of bytes consumed.
fn decode_reference(input: &str, mode: UnescapeMode) -> Option<(char, usize)> {
    let bytes = input.as_bytes();

    if bytes.get(1) == Some(&b'#') {
        return if matches!(bytes.get(2), Some(b'x' | b'X')) {
            let digits = count_while(&bytes[3..], |b| b.is_ascii_hexdigit());

            if digits == 0 || bytes.get(3 + digits) != Some(&b';') {
                return None;
            }

            let code = u32::from_str_radix(&input[3..3 + digits], 16).ok()?;

            char::from_u32(code)
                .filter(|&c| c != '\0')
                .map(|c| (c, 4 + digits))
        } else {
            let digits = count_while(&bytes[2..], |b| b.is_ascii_digit());

            if digits == 0 {
                return None;
            }

            let code = input[2..2 + digits].parse::<u32>().ok()?;
            let terminated = bytes.get(2 + digits) == Some(&b';');

            char::from_u32(code)
                .filter(|&c| c != '\0')
                .map(|c| (c, 2 + digits + usize::from(terminated)))
        };
    }

    let len = count_while(&bytes[1..], |b| b.is_ascii_alphanumeric());

    if len == 0 {
        return None;
    }

    let name = &input[1..1 + len];
    let terminated = bytes.get(1 + len) == Some(&b';');
    let ch = *ENTITIES.by_name.get(name)?;

    if terminated {
        Some((ch, len + 2))
    } else if mode == UnescapeMode::Text && is_latin1_name(name) {
        Some((ch, len + 1))
    } else {
        None
    }
}

#[inline]
fn count_while(bytes: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|&&b| pred(b)).count()
}
