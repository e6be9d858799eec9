//! Lexical database (wordnet) tier
//!
//! Reads a WN-LMF lexicon (plain or gzip-compressed XML, e.g. DanNet) into
//! an in-memory index from written form to senses.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flate2::read::GzDecoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::types::{LookupError, Sense};
use crate::language::Language;

/// Loaded lexical database
pub trait LexicalDatabase: Send + Sync {
    /// Senses of `word` in `language`, in lexicon order
    fn senses(&self, word: &str, language: Language) -> Vec<Sense>;
}

/// Loads a lexical database on demand
#[async_trait]
pub trait LexiconSource: Send + Sync {
    async fn load(&self) -> Result<Box<dyn LexicalDatabase>, LookupError>;
}

/// WN-LMF file on disk
pub struct WnLmfFile {
    path: PathBuf,
}

impl WnLmfFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LexiconSource for WnLmfFile {
    async fn load(&self) -> Result<Box<dyn LexicalDatabase>, LookupError> {
        let path = self.path.clone();
        let started = std::time::Instant::now();
        let wordnet = tokio::task::spawn_blocking(move || WordNet::from_path(&path))
            .await
            .map_err(|e| LookupError::Xml(format!("lexicon load task failed: {}", e)))??;

        tracing::info!(
            lexicon = %self.path.display(),
            forms = wordnet.forms.len(),
            synsets = wordnet.definitions.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Lexical database loaded"
        );
        Ok(Box::new(wordnet))
    }
}

/// In-memory wordnet index
#[derive(Debug, Default)]
pub struct WordNet {
    /// (language, lower-cased written form) -> synset ids in order
    forms: HashMap<(Language, String), Vec<String>>,
    /// synset id -> first definition
    definitions: HashMap<String, String>,
}

/// Parser position inside the document
#[derive(Default)]
struct ParseState {
    language: Option<Language>,
    entry_form: Option<String>,
    entry_synsets: Vec<String>,
    synset: Option<String>,
    in_definition: bool,
    definition: String,
}

impl WordNet {
    pub fn from_path(path: &Path) -> Result<Self, LookupError> {
        let file = File::open(path)?;
        let is_gzip = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);

        if is_gzip {
            Self::from_reader(BufReader::new(GzDecoder::new(file)))
        } else {
            Self::from_reader(BufReader::new(file))
        }
    }

    pub fn from_reader<R: BufRead>(source: R) -> Result<Self, LookupError> {
        let mut reader = Reader::from_reader(source);
        let mut wordnet = WordNet::default();
        let mut state = ParseState::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => wordnet.open(&e, &mut state, false)?,
                Event::Empty(e) => wordnet.open(&e, &mut state, true)?,
                Event::Text(t) if state.in_definition => {
                    let text = t.unescape()?;
                    state.definition.push_str(&text);
                }
                Event::End(e) => wordnet.close(e.name().as_ref(), &mut state),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(wordnet)
    }

    fn open(&mut self, e: &BytesStart<'_>, state: &mut ParseState, empty: bool) -> Result<(), LookupError> {
        match e.name().as_ref() {
            b"Lexicon" => {
                state.language = attribute(e, b"language")?.and_then(|l| l.parse().ok());
            }
            b"LexicalEntry" => {
                state.entry_form = None;
                state.entry_synsets.clear();
            }
            b"Lemma" => {
                state.entry_form = attribute(e, b"writtenForm")?;
            }
            b"Sense" => {
                if let Some(synset) = attribute(e, b"synset")? {
                    state.entry_synsets.push(synset);
                }
            }
            b"Synset" if !empty => {
                state.synset = attribute(e, b"id")?;
            }
            b"Definition" if !empty => {
                state.in_definition = true;
                state.definition.clear();
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8], state: &mut ParseState) {
        match name {
            b"LexicalEntry" => {
                let (Some(language), Some(form)) = (state.language, state.entry_form.take()) else {
                    return;
                };
                let synsets = self.forms.entry((language, form.to_lowercase())).or_default();
                for synset in state.entry_synsets.drain(..) {
                    if !synsets.contains(&synset) {
                        synsets.push(synset);
                    }
                }
            }
            b"Definition" => {
                state.in_definition = false;
                if let Some(synset) = &state.synset {
                    let gloss = state.definition.trim();
                    if !gloss.is_empty() && !self.definitions.contains_key(synset) {
                        self.definitions.insert(synset.clone(), gloss.to_string());
                    }
                }
            }
            b"Synset" => state.synset = None,
            _ => {}
        }
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, LookupError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| LookupError::Xml(err.to_string()))?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

impl LexicalDatabase for WordNet {
    fn senses(&self, word: &str, language: Language) -> Vec<Sense> {
        let Some(synsets) = self.forms.get(&(language, word.to_lowercase())) else {
            return Vec::new();
        };

        // senses without a definition carry nothing to translate
        synsets
            .iter()
            .filter_map(|id| {
                self.definitions.get(id).map(|gloss| Sense {
                    synset: id.clone(),
                    gloss: gloss.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LMF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<LexicalResource xmlns:dc="https://globalwordnet.github.io/schemas/dc/">
  <Lexicon id="dn" label="DanNet" language="da" email="x@y" license="cc" version="2.2">
    <LexicalEntry id="dn-hund-n">
      <Lemma writtenForm="hund" partOfSpeech="n"/>
      <Sense id="dn-hund-n-1" synset="dn-s-1"/>
      <Sense id="dn-hund-n-2" synset="dn-s-2"/>
    </LexicalEntry>
    <LexicalEntry id="dn-kat-n">
      <Lemma writtenForm="kat" partOfSpeech="n"/>
      <Sense id="dn-kat-n-1" synset="dn-s-3"/>
    </LexicalEntry>
    <Synset id="dn-s-1" ili="i1" partOfSpeech="n">
      <Definition>tamt rovdyr &amp; husdyr</Definition>
    </Synset>
    <Synset id="dn-s-2" partOfSpeech="n">
      <Definition>skældsord om en person</Definition>
    </Synset>
    <Synset id="dn-s-3" partOfSpeech="n"/>
  </Lexicon>
</LexicalResource>
"#;

    #[test]
    fn test_senses_follow_lexicon_order() {
        let wordnet = WordNet::from_reader(LMF.as_bytes()).unwrap();
        let senses = wordnet.senses("Hund", Language::Danish);

        assert_eq!(senses.len(), 2);
        assert_eq!(senses[0].gloss, "tamt rovdyr & husdyr");
        assert_eq!(senses[1].synset, "dn-s-2");
    }

    #[test]
    fn test_language_and_definition_filters() {
        let wordnet = WordNet::from_reader(LMF.as_bytes()).unwrap();
        assert!(wordnet.senses("hund", Language::English).is_empty());
        // kat's synset has no definition
        assert!(wordnet.senses("kat", Language::Danish).is_empty());
        assert!(wordnet.senses("xyzzy", Language::Danish).is_empty());
    }

    #[tokio::test]
    async fn test_gzip_file_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dannet-wn-lmf.xml.gz");
        let mut encoder = flate2::write::GzEncoder::new(
            File::create(&path).unwrap(),
            flate2::Compression::default(),
        );
        encoder.write_all(LMF.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let db = WnLmfFile::new(&path).load().await.unwrap();
        assert_eq!(db.senses("hund", Language::Danish).len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_fails_to_load() {
        let result = WnLmfFile::new("/nonexistent/lexicon.xml").load().await;
        assert!(matches!(result, Err(LookupError::Io(_))));
    }
}
