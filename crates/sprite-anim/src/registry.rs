use std::path::Path;

use log::debug;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::RegistryError;

/// Frame geometry of one animation listed in an `AnimData.xml` registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationEntry {
    pub name: String,
    pub frame_width: u32,
    pub frame_height: u32,
}

/// The animation picked for an entity by priority resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAnimation {
    pub name: String,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl From<&AnimationEntry> for ResolvedAnimation {
    fn from(entry: &AnimationEntry) -> Self {
        Self {
            name: entry.name.clone(),
            frame_width: entry.frame_width,
            frame_height: entry.frame_height,
        }
    }
}

/// Usable animation entries of one registry document, in document order.
///
/// Entries missing `Name`, `FrameWidth` or `FrameHeight`, or carrying a
/// non-positive size, are dropped while parsing and can never be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimRegistry {
    entries: Vec<AnimationEntry>,
}

impl AnimRegistry {
    pub fn new(entries: Vec<AnimationEntry>) -> Self {
        Self { entries }
    }

    /// Parse a registry document from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RegistryError> {
        read_registry(bytes)
    }

    /// Parse a registry document stored on disk.
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let bytes = std::fs::read(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn entries(&self) -> &[AnimationEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the first priority name present in the registry.
    ///
    /// Priority order dominates document order: a later priority name is
    /// only considered once every earlier one is known to be absent.
    pub fn resolve<S: AsRef<str>>(&self, priority: &[S]) -> Option<ResolvedAnimation> {
        priority.iter().find_map(|target| {
            let target = target.as_ref();
            self.entries
                .iter()
                .find(|entry| entry.name == target)
                .map(ResolvedAnimation::from)
        })
    }
}

// Streaming walk over AnimData.xml.
//
// Mirrors path lookups on the element tree: the first `Anims` child of the
// root, its direct `Anim` children, and for each of those the first `Name`,
// `FrameWidth` and `FrameHeight` child. A field's value is the text before its
// first child element. Any other element shape only affects the entry it
// appears in.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    FrameWidth,
    FrameHeight,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"Name" => Some(Field::Name),
            b"FrameWidth" => Some(Field::FrameWidth),
            b"FrameHeight" => Some(Field::FrameHeight),
            _ => None,
        }
    }
}

/// First occurrence of each field; `Some(None)` is a field without text.
#[derive(Debug, Default)]
struct AnimFields {
    name: Option<Option<String>>,
    frame_width: Option<Option<String>>,
    frame_height: Option<Option<String>>,
}

impl AnimFields {
    fn slot(&mut self, field: Field) -> &mut Option<Option<String>> {
        match field {
            Field::Name => &mut self.name,
            Field::FrameWidth => &mut self.frame_width,
            Field::FrameHeight => &mut self.frame_height,
        }
    }

    fn into_entry(self) -> Option<AnimationEntry> {
        let name = self.name.flatten()?.trim().to_string();
        if name.is_empty() {
            return None;
        }
        let (Some(width), Some(height)) = (
            parse_dimension(self.frame_width.flatten().as_deref()),
            parse_dimension(self.frame_height.flatten().as_deref()),
        ) else {
            debug!("Ignoring animation {name}: missing or invalid frame size");
            return None;
        };
        Some(AnimationEntry {
            name,
            frame_width: width,
            frame_height: height,
        })
    }
}

/// Text being collected for one field of the current `Anim`.
struct Capture {
    field: Field,
    text: String,
    leading: bool,
}

// Element depths, counting the root as 1.
const ANIMS_DEPTH: usize = 2;
const ANIM_DEPTH: usize = 3;
const FIELD_DEPTH: usize = 4;

fn read_registry(bytes: &[u8]) -> Result<AnimRegistry, RegistryError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().expand_empty_elements = true;

    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut seen_anims = false;
    let mut in_anims = false;
    let mut current: Option<AnimFields> = None;
    let mut capture: Option<Capture> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if depth == 0 {
                    if seen_root {
                        return Err(RegistryError::Malformed("multiple root elements"));
                    }
                    seen_root = true;
                }
                depth += 1;
                let tag = e.name();
                match depth {
                    ANIMS_DEPTH if !seen_anims && tag.as_ref() == b"Anims" => {
                        seen_anims = true;
                        in_anims = true;
                    }
                    ANIM_DEPTH if in_anims && tag.as_ref() == b"Anim" => {
                        current = Some(AnimFields::default());
                    }
                    FIELD_DEPTH => {
                        if let (Some(fields), Some(field)) =
                            (current.as_mut(), Field::from_tag(tag.as_ref()))
                        {
                            if fields.slot(field).is_none() {
                                capture = Some(Capture {
                                    field,
                                    text: String::new(),
                                    leading: true,
                                });
                            }
                        }
                    }
                    _ => {
                        if let Some(capture) = capture.as_mut() {
                            capture.leading = false;
                        }
                    }
                }
            }
            Event::End(_) => {
                match depth {
                    ANIMS_DEPTH => in_anims = false,
                    ANIM_DEPTH => {
                        if let Some(entry) = current.take().and_then(AnimFields::into_entry) {
                            entries.push(entry);
                        }
                    }
                    FIELD_DEPTH => {
                        if let (Some(fields), Some(capture)) = (current.as_mut(), capture.take()) {
                            let text = Some(capture.text).filter(|t| !t.is_empty());
                            *fields.slot(capture.field) = Some(text);
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                match capture.as_mut() {
                    Some(capture) if capture.leading => capture.text.push_str(&text),
                    _ if depth == 0 && !text.trim().is_empty() => {
                        return Err(RegistryError::Malformed("text outside the root element"));
                    }
                    _ => {}
                }
            }
            Event::CData(e) => {
                if let Some(capture) = capture.as_mut().filter(|c| c.leading) {
                    let text = e.decode().map_err(quick_xml::Error::from)?;
                    capture.text.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(RegistryError::Malformed("no root element"));
    }
    if depth > 0 {
        return Err(RegistryError::Malformed("unexpected end of document"));
    }
    Ok(AnimRegistry { entries })
}

fn parse_dimension(text: Option<&str>) -> Option<u32> {
    text?.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" ?>
<AnimData>
    <ShadowSize>1</ShadowSize>
    <Anims>
        <Anim>
            <Name>Walk</Name>
            <Index>0</Index>
            <FrameWidth>24</FrameWidth>
            <FrameHeight>24</FrameHeight>
            <Durations>
                <Duration>8</Duration>
                <Duration>10</Duration>
            </Durations>
        </Anim>
        <Anim>
            <Name>Sleep</Name>
            <CopyOf>Walk</CopyOf>
        </Anim>
        <Anim>
            <Name>Idle</Name>
            <Index>7</Index>
            <FrameWidth>32</FrameWidth>
            <FrameHeight>32</FrameHeight>
        </Anim>
    </Anims>
</AnimData>"#;

    fn entry(name: &str, w: u32, h: u32) -> AnimationEntry {
        AnimationEntry {
            name: name.to_string(),
            frame_width: w,
            frame_height: h,
        }
    }

    #[test]
    fn parse_keeps_document_order_and_drops_incomplete() {
        let registry = AnimRegistry::from_bytes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            registry.entries(),
            &[entry("Walk", 24, 24), entry("Idle", 32, 32)]
        );
    }

    #[test]
    fn priority_beats_document_order() {
        let registry = AnimRegistry::from_bytes(SAMPLE.as_bytes()).unwrap();
        let resolved = registry.resolve(&["Idle", "Hover", "Walk"]).unwrap();
        assert_eq!(resolved.name, "Idle");
        assert_eq!((resolved.frame_width, resolved.frame_height), (32, 32));
    }

    #[test]
    fn falls_through_to_later_priority_names() {
        let registry = AnimRegistry::from_bytes(SAMPLE.as_bytes()).unwrap();
        let resolved = registry.resolve(&["Hover", "Walk"]).unwrap();
        assert_eq!(resolved.name, "Walk");
    }

    #[test]
    fn no_match_is_none() {
        let registry = AnimRegistry::from_bytes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(registry.resolve(&["Hover"]), None);
        // Present by name but without geometry.
        assert_eq!(registry.resolve(&["Sleep"]), None);
    }

    #[test]
    fn incomplete_entry_does_not_hide_a_later_complete_one() {
        let xml = r#"<AnimData><Anims>
            <Anim><Name>Idle</Name><FrameWidth>16</FrameWidth></Anim>
            <Anim><Name>Idle</Name><FrameWidth>16</FrameWidth><FrameHeight>8</FrameHeight></Anim>
        </Anims></AnimData>"#;
        let registry = AnimRegistry::from_bytes(xml.as_bytes()).unwrap();
        assert_eq!(
            registry.resolve(&["Idle"]),
            Some(ResolvedAnimation {
                name: "Idle".to_string(),
                frame_width: 16,
                frame_height: 8,
            })
        );
    }

    #[test]
    fn zero_or_garbage_dimensions_are_not_usable() {
        let xml = r#"<AnimData><Anims>
            <Anim><Name>Idle</Name><FrameWidth>0</FrameWidth><FrameHeight>8</FrameHeight></Anim>
            <Anim><Name>Hover</Name><FrameWidth>abc</FrameWidth><FrameHeight>8</FrameHeight></Anim>
        </Anims></AnimData>"#;
        let registry = AnimRegistry::from_bytes(xml.as_bytes()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn missing_anims_is_an_empty_registry() {
        let registry = AnimRegistry::from_bytes(b"<AnimData><ShadowSize>1</ShadowSize></AnimData>")
            .unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn mismatched_tags_are_a_parse_error() {
        let xml = b"<AnimData><Anims><Anim><Name>Idle</Anim></Anims></AnimData>";
        let err = AnimRegistry::from_bytes(xml).unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }

    #[test]
    fn truncated_or_empty_documents_are_errors() {
        for xml in [
            &b""[..],
            b"   ",
            b"<AnimData><Anims><Anim><Name>Idle</Name>",
            b"<AnimData><Anims><Anim",
            b"<AnimData/><AnimData/>",
        ] {
            assert!(AnimRegistry::from_bytes(xml).is_err(), "{xml:?}");
        }
    }

    #[test]
    fn only_the_first_anims_block_is_read() {
        let xml = r#"<AnimData>
            <Anims>
                <Anim><Name>Idle</Name><FrameWidth>16</FrameWidth><FrameHeight>8</FrameHeight></Anim>
            </Anims>
            <Anims>
                <Anim><Name>Walk</Name><FrameWidth>24</FrameWidth><FrameHeight>24</FrameHeight></Anim>
            </Anims>
        </AnimData>"#;
        let registry = AnimRegistry::from_bytes(xml.as_bytes()).unwrap();
        assert_eq!(registry.entries(), &[entry("Idle", 16, 8)]);
    }

    #[test]
    fn nested_element_in_size_drops_only_that_entry() {
        let xml = r#"<AnimData><Anims>
            <Anim><Name>Idle</Name><FrameWidth><x>4</x></FrameWidth><FrameHeight>8</FrameHeight></Anim>
            <Anim><Name>Idle</Name><FrameWidth>16</FrameWidth><FrameHeight>8</FrameHeight></Anim>
        </Anims></AnimData>"#;
        let registry = AnimRegistry::from_bytes(xml.as_bytes()).unwrap();
        assert_eq!(registry.entries(), &[entry("Idle", 16, 8)]);
    }

    #[test]
    fn field_value_is_text_before_first_child() {
        let xml = r#"<AnimData><Anims>
            <Anim><Name>Idle<b/>Tail</Name><FrameWidth>16<!-- px --></FrameWidth><FrameHeight><![CDATA[8]]></FrameHeight></Anim>
        </Anims></AnimData>"#;
        let registry = AnimRegistry::from_bytes(xml.as_bytes()).unwrap();
        assert_eq!(registry.entries(), &[entry("Idle", 16, 8)]);
    }

    #[test]
    fn first_occurrence_of_a_field_wins() {
        let xml = r#"<AnimData><Anims>
            <Anim><Name>Idle</Name><FrameWidth/><FrameWidth>16</FrameWidth><FrameHeight>8</FrameHeight></Anim>
            <Anim><Name>Hover</Name><FrameWidth>4</FrameWidth><FrameWidth>9</FrameWidth><FrameHeight>4</FrameHeight></Anim>
        </Anims></AnimData>"#;
        let registry = AnimRegistry::from_bytes(xml.as_bytes()).unwrap();
        assert_eq!(registry.entries(), &[entry("Hover", 4, 4)]);
    }

    #[test]
    fn anim_outside_anims_is_ignored() {
        let xml = r#"<AnimData>
            <Anim><Name>Walk</Name><FrameWidth>24</FrameWidth><FrameHeight>24</FrameHeight></Anim>
            <Anims><Group><Anim><Name>Idle</Name><FrameWidth>8</FrameWidth><FrameHeight>8</FrameHeight></Anim></Group></Anims>
        </AnimData>"#;
        let registry = AnimRegistry::from_bytes(xml.as_bytes()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AnimData.xml");
        std::fs::write(&path, SAMPLE).unwrap();
        let registry = AnimRegistry::from_path(&path).unwrap();
        assert_eq!(registry.entries().len(), 2);
    }

    #[test]
    fn from_path_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AnimRegistry::from_path(&dir.path().join("AnimData.xml")).unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        const NAMES: &[&str] = &["Idle", "Hover", "Walk", "Sleep", "Attack"];

        fn arb_entries() -> impl Strategy<Value = Vec<AnimationEntry>> {
            prop::collection::vec(
                (prop::sample::select(NAMES), 1u32..64, 1u32..64)
                    .prop_map(|(n, w, h)| entry(n, w, h)),
                0..8,
            )
        }

        proptest! {
            #[test]
            fn resolves_first_priority_name_present(
                entries in arb_entries(),
                priority in prop::sample::subsequence(NAMES.to_vec(), 1..=NAMES.len()).prop_shuffle(),
            ) {
                let registry = AnimRegistry::new(entries.clone());
                let expected = priority
                    .iter()
                    .find_map(|p| entries.iter().find(|e| e.name == *p))
                    .map(ResolvedAnimation::from);
                prop_assert_eq!(registry.resolve(&priority), expected);
            }
        }
    }
}
