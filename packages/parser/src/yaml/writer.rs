//! YAML writer for parsed agendas and questions.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::agenda::Agenda;
use crate::config::DEFAULT_OUTPUT_DIR;
use crate::error::Result;
use crate::question::SingleQuestion;
use crate::types::{
    Language, Question, QuestionType, RawBlock, SectionHeader, SectionKey, TabledPaper,
};

/// Single-quoted scalar on a mapping or sequence line.
/// Captures: (1) indentation, dashes and key, (2) the value between the quotes.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static QUOTED_SCALAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*(?:- )*(?:[a-z_][a-z0-9_]*: )?)'([^']*)'$").expect("valid regex")
});

/// Line whose value is a literal or folded block scalar, e.g. `body: |-`.
/// Captures: (1) dashes, (2) key.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BLOCK_SCALAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:- )*)([a-z_][a-z0-9_]*: )?[|>](?:[-+]?[0-9]?|[0-9][-+])$")
        .expect("valid regex")
});

/// Plain scalars a YAML 1.1 loader resolves to something other than a string:
/// booleans, null, numbers (including sexagesimal ones such as `15:31`) and
/// timestamps.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static IMPLICIT_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?i:y|n|yes|no|true|false|on|off|null|~)$",
        r"|^[-+]?(?:[0-9][0-9_]*(?:\.[0-9_]*)?(?:[eE][-+]?[0-9]+)?|\.[0-9_]+|0x[0-9a-fA-F_]+)$",
        r"|^[-+]?\.(?:inf|Inf|INF)$|^\.(?:nan|NaN|NAN)$",
        r"|^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}",
        r"|:[0-9]",
    ))
    .expect("valid regex")
});

/// Characters that cannot start a plain scalar.
const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
    '`',
];

/// Header representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlHeader<'a> {
    section: SectionKey,
    text: &'a str,
}

impl<'a> From<&'a SectionHeader> for YamlHeader<'a> {
    fn from(h: &'a SectionHeader) -> Self {
        Self {
            section: h.section,
            text: &h.text,
        }
    }
}

/// Agenda question representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlQuestion<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    asker: Option<&'a str>,
    #[serde(rename = "type")]
    question_type: QuestionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    replier: Option<&'a str>,
    body: &'a str,
}

impl<'a> From<&'a Question> for YamlQuestion<'a> {
    fn from(q: &'a Question) -> Self {
        Self {
            number: q.number.as_deref(),
            asker: q.asker.as_deref(),
            question_type: q.question_type,
            replier: q.replier.as_deref(),
            body: &q.body,
        }
    }
}

/// Unparsed block representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlBlock<'a> {
    tag: &'a str,
    html: &'a str,
}

impl<'a> From<&'a RawBlock> for YamlBlock<'a> {
    fn from(b: &'a RawBlock) -> Self {
        Self {
            tag: &b.tag,
            html: &b.html,
        }
    }
}

/// Full agenda representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlAgenda<'a> {
    uid: &'a str,
    language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    headers: Vec<YamlHeader<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tabled_papers: Option<&'a [TabledPaper]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    members_bills: Option<Vec<YamlBlock<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    members_motions: Option<Vec<YamlBlock<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    questions: Option<Vec<YamlQuestion<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bills: Option<Vec<YamlBlock<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    motions: Option<Vec<YamlBlock<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    other: Option<Vec<YamlBlock<'a>>>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    warnings: &'a [String],
}

/// Single question representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlSingleQuestion<'a> {
    uid: &'a str,
    language: Language,
    date: String,
    is_urgent: bool,
    is_oral: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    asker: Option<&'a str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    repliers: &'a [String],
    subject: &'a str,
    body: &'a str,
    reply_subject: &'a str,
    reply_body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_link: Option<&'a str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    warnings: &'a [String],
}

/// Sitting date encoded in a uid such as `council_agenda-20131009-e`.
fn uid_date(uid: &str) -> Option<NaiveDate> {
    uid.split('-')
        .filter(|part| part.len() == 8)
        .find_map(|part| NaiveDate::parse_from_str(part, "%Y%m%d").ok())
}

fn blocks(section: Option<&Vec<RawBlock>>) -> Option<Vec<YamlBlock<'_>>> {
    section.map(|b| b.iter().map(YamlBlock::from).collect())
}

/// Build the YAML structure for an agenda.
fn agenda_yaml_struct(agenda: &Agenda) -> YamlAgenda<'_> {
    YamlAgenda {
        uid: &agenda.uid,
        language: agenda.language,
        date: uid_date(&agenda.uid).map(|d| d.format("%Y-%m-%d").to_string()),
        headers: agenda.headers.iter().map(YamlHeader::from).collect(),
        tabled_papers: agenda.tabled_papers.as_deref(),
        members_bills: blocks(agenda.members_bills.as_ref()),
        members_motions: blocks(agenda.members_motions.as_ref()),
        questions: agenda
            .questions
            .as_ref()
            .map(|q| q.iter().map(YamlQuestion::from).collect()),
        bills: blocks(agenda.bills.as_ref()),
        motions: blocks(agenda.motions.as_ref()),
        other: blocks(agenda.other.as_ref()),
        warnings: &agenda.warnings,
    }
}

/// Build the YAML structure for a single question.
fn question_yaml_struct(question: &SingleQuestion) -> YamlSingleQuestion<'_> {
    YamlSingleQuestion {
        uid: &question.uid,
        language: question.language,
        date: question.date.format("%Y-%m-%d").to_string(),
        is_urgent: question.is_urgent,
        is_oral: question.is_oral,
        asker: question.asker.as_deref(),
        repliers: &question.repliers,
        subject: &question.subject,
        body: &question.body,
        reply_subject: &question.reply_subject,
        reply_body: &question.reply_body,
        reply_link: question.reply_link.as_deref(),
        warnings: &question.warnings,
    }
}

/// Check whether a single-quoted value must keep its quotes to stay a string.
fn keeps_quotes(value: &str) -> bool {
    value.is_empty()
        || value.trim() != value
        || value.starts_with(INDICATORS)
        || value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
        || IMPLICIT_TYPE.is_match(value)
}

/// Drop the quotes around a value that reads the same without them.
fn unquote(line: &str) -> Cow<'_, str> {
    match QUOTED_SCALAR.captures(line) {
        Some(caps) if !keeps_quotes(&caps[2]) => Cow::Owned(format!("{}{}", &caps[1], &caps[2])),
        _ => Cow::Borrowed(line),
    }
}

/// Column above which the content of a block scalar opened on this line sits.
fn block_scalar_parent(indent: usize, content: &str) -> Option<usize> {
    let caps = BLOCK_SCALAR.captures(content)?;
    let dashes = caps.get(1).map_or(0, |m| m.len());
    Some(match caps.get(2) {
        // Content is indented past the key
        Some(_) => indent + dashes,
        // A bare item: content is indented past its dash
        None => indent + dashes.saturating_sub(2),
    })
}

/// Rework serde_yaml_ng output into the layout yamllint expects.
///
/// Sequence items are indented under their parent key, and quotes are kept
/// only where a YAML 1.1 loader would otherwise read a non-string. Lines inside
/// block scalars (multi-line question bodies) are content: they are shifted
/// with their parent but never reinterpreted.
///
/// ```yaml
/// # serde_yaml_ng:   # written:
/// repliers:          repliers:
/// - 'Officer'          - Officer
/// - '15:31'            - '15:31'
/// ```
fn tidy_yaml(yaml: &str) -> String {
    let mut lines = Vec::new();
    // Indents at which the open sequences have their dashes
    let mut sequences: Vec<usize> = Vec::new();
    let mut block_parent: Option<usize> = None;

    for line in yaml.lines() {
        let content = line.trim_start();
        let indent = line.len() - content.len();

        if let Some(parent) = block_parent {
            if content.is_empty() || indent > parent {
                lines.push(shift(line, sequences.len()));
                continue;
            }
            block_parent = None;
        }
        if content.is_empty() {
            lines.push(String::new());
            continue;
        }

        let is_item = content.starts_with("- ");
        while sequences
            .last()
            .is_some_and(|&dash| indent < dash || (indent == dash && !is_item))
        {
            sequences.pop();
        }
        if is_item && sequences.last() != Some(&indent) {
            sequences.push(indent);
        }

        block_parent = block_scalar_parent(indent, content);
        lines.push(shift(&unquote(line), sequences.len()));
    }

    lines.join("\n")
}

/// Indent a line by two spaces per open sequence.
fn shift(line: &str, levels: usize) -> String {
    if levels == 0 || line.is_empty() {
        line.to_string()
    } else {
        format!("{}{line}", "  ".repeat(levels))
    }
}

/// Serialize and post-process for yamllint compliance.
fn to_yaml<T: Serialize>(value: &T) -> Result<String> {
    let yaml_string = tidy_yaml(&serde_yaml_ng::to_string(value)?);

    // Document start marker, no trailing whitespace
    let lines: Vec<&str> = yaml_string.lines().map(str::trim_end).collect();
    Ok(format!("---\n{}\n", lines.join("\n")))
}

/// Generate a YAML string from a parsed agenda.
///
/// # Errors
/// Returns `YamlSerialization` if serialization fails.
pub fn generate_yaml(agenda: &Agenda) -> Result<String> {
    to_yaml(&agenda_yaml_struct(agenda))
}

/// Generate a YAML string from a parsed question document.
///
/// # Errors
/// Returns `YamlSerialization` if serialization fails.
pub fn generate_question_yaml(question: &SingleQuestion) -> Result<String> {
    to_yaml(&question_yaml_struct(question))
}

/// Write `content` to `dir/<uid>.yaml`.
///
/// Uses atomic write pattern: writes to temp file, syncs to disk, then renames.
/// This ensures partial writes don't corrupt existing files on crash.
fn write_atomic(dir: &Path, uid: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let output_file = dir.join(format!("{uid}.yaml"));
    let temp_file = dir.join(format!(".{uid}.yaml.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if output_file.exists() {
        fs::remove_file(&output_file)?;
    }

    fs::rename(&temp_file, &output_file)?;
    tracing::debug!(path = %output_file.display(), "Saved YAML");

    Ok(output_file)
}

/// Save an agenda as `<output_base>/<uid>.yaml`.
///
/// # Arguments
/// * `agenda` - The parsed agenda
/// * `output_base` - Output directory (default: `parsed/`)
///
/// # Returns
/// Path to the saved file
///
/// # Errors
/// Returns `Io` if the directory or file cannot be written.
pub fn save_yaml(agenda: &Agenda, output_base: Option<&Path>) -> Result<PathBuf> {
    let dir = output_base.unwrap_or(Path::new(DEFAULT_OUTPUT_DIR));
    let content = generate_yaml(agenda)?;
    write_atomic(dir, &agenda.uid, &content)
}

/// Save a question document as `<output_base>/<uid>.yaml`.
///
/// # Errors
/// Returns `Io` if the directory or file cannot be written.
pub fn save_question_yaml(question: &SingleQuestion, output_base: Option<&Path>) -> Result<PathBuf> {
    let dir = output_base.unwrap_or(Path::new(DEFAULT_OUTPUT_DIR));
    let content = generate_question_yaml(question)?;
    write_atomic(dir, &question.uid, &content)
}
