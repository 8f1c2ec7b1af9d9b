use std::fmt;

/// RDF graph serialization formats exchanged with the Graph Store HTTP Protocol.
///
/// This enumeration is non exhaustive. New formats might be added in the future.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
#[non_exhaustive]
pub enum GraphFormat {
    /// [N-Triples](https://www.w3.org/TR/n-triples/)
    NTriples,
    /// [RDF/XML](https://www.w3.org/TR/rdf-syntax-grammar/)
    RdfXml,
    /// [Turtle](https://www.w3.org/TR/turtle/)
    Turtle,
    /// [JSON-LD](https://www.w3.org/TR/json-ld/)
    JsonLd,
}

impl GraphFormat {
    /// The format [IANA media type](https://tools.ietf.org/html/rfc2046).
    ///
    /// ```
    /// use sparclient::GraphFormat;
    ///
    /// assert_eq!(GraphFormat::Turtle.media_type(), "text/turtle")
    /// ```
    #[inline]
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::JsonLd => "application/ld+json",
            Self::NTriples => "application/n-triples",
            Self::RdfXml => "application/rdf+xml",
            Self::Turtle => "text/turtle",
        }
    }

    /// The format [IANA-registered](https://tools.ietf.org/html/rfc2046) file extension.
    ///
    /// ```
    /// use sparclient::GraphFormat;
    ///
    /// assert_eq!(GraphFormat::NTriples.file_extension(), "nt")
    /// ```
    #[inline]
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::JsonLd => "jsonld",
            Self::NTriples => "nt",
            Self::RdfXml => "rdf",
            Self::Turtle => "ttl",
        }
    }

    /// The format name.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::JsonLd => "JSON-LD",
            Self::NTriples => "N-Triples",
            Self::RdfXml => "RDF/XML",
            Self::Turtle => "Turtle",
        }
    }

    /// Looks for a known format from a media type.
    ///
    /// It supports some media type aliases.
    /// For example, "application/xml" is going to return `GraphFormat::RdfXml` even if it is not its canonical media type.
    ///
    /// ```
    /// use sparclient::GraphFormat;
    ///
    /// assert_eq!(
    ///     GraphFormat::from_media_type("text/turtle; charset=utf-8"),
    ///     Some(GraphFormat::Turtle)
    /// )
    /// ```
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        const MEDIA_SUBTYPES: [(&str, GraphFormat); 8] = [
            ("json", GraphFormat::JsonLd),
            ("ld+json", GraphFormat::JsonLd),
            ("n-triples", GraphFormat::NTriples),
            ("ntriples", GraphFormat::NTriples),
            ("plain", GraphFormat::NTriples),
            ("rdf+xml", GraphFormat::RdfXml),
            ("turtle", GraphFormat::Turtle),
            ("xml", GraphFormat::RdfXml),
        ];

        let (type_subtype, _) = media_type.split_once(';').unwrap_or((media_type, ""));
        let (r#type, subtype) = type_subtype.split_once('/')?;
        let r#type = r#type.trim();
        if !r#type.eq_ignore_ascii_case("application") && !r#type.eq_ignore_ascii_case("text") {
            return None;
        }
        let subtype = subtype.trim();
        let subtype = subtype.strip_prefix("x-").unwrap_or(subtype);
        MEDIA_SUBTYPES
            .into_iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(subtype))
            .map(|(_, format)| format)
    }

    /// Looks for a known format from an extension.
    ///
    /// ```
    /// use sparclient::GraphFormat;
    ///
    /// assert_eq!(GraphFormat::from_extension("ttl"), Some(GraphFormat::Turtle))
    /// ```
    pub fn from_extension(extension: &str) -> Option<Self> {
        const EXTENSIONS: [(&str, GraphFormat); 7] = [
            ("json", GraphFormat::JsonLd),
            ("jsonld", GraphFormat::JsonLd),
            ("nt", GraphFormat::NTriples),
            ("rdf", GraphFormat::RdfXml),
            ("ttl", GraphFormat::Turtle),
            ("txt", GraphFormat::NTriples),
            ("xml", GraphFormat::RdfXml),
        ];
        EXTENSIONS
            .into_iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(extension))
            .map(|(_, format)| format)
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
