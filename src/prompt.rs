//! Prompt construction for commit message generation.
//!
//! The prompt is a fixed preamble followed by tagged blocks, always in the
//! same order:
//!
//! 1. `<Rule>` formatting constraints
//! 2. `<GitCommitType>` taxonomy
//! 3. `<GitCommitEmoji>` (emoji enabled only)
//! 4. `<CommitInfo>` user hint, changed files, diff
//! 5. `<RelatedFiles>` sibling listings (when any were collected)
//! 6. `<ChainOfThought>` (chain of thought enabled only)
//! 7. `<I18n>` target language
//! 8. `<OutputTemplate>` JSON shape of the answer
//!
//! [`build_prompt`] does no I/O; identical inputs give identical bytes.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use tracing::debug;

use crate::commit::COMMIT_TYPES;
use crate::config::Config;

const PREAMBLE: &str =
    "You now need to help the user generate the message for the git commit please follow the rules";

const RULES: &str = "\
<Rule>
- Write in first-person singular present tense
- Be concise and direct
- Output only the commit message without any explanations
- Commit message should start with a lowercase letter
- Commit message must be a maximum of 72 characters
- Exclude anything unnecessary such as translation. Your entire response will be passed directly into git commit
- Do not repeat the subject in the commit message
</Rule>";

/// Everything the model needs to know about one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitRequest {
    /// Free text from `-c/--commit`, passed through verbatim.
    pub user_hint: Option<String>,
    /// Unified diff of the staged changes.
    pub diff: String,
    /// Repository-relative paths, in git's order.
    pub files: Vec<String>,
    /// Parent directory → comma-separated listing of its entries.
    pub related: BTreeMap<String, String>,
}

impl CommitRequest {
    pub fn new(user_hint: Option<String>, diff: String, files: Vec<String>) -> Self {
        Self {
            user_hint: user_hint.filter(|h| !h.is_empty()),
            diff,
            files,
            related: BTreeMap::new(),
        }
    }

    pub fn with_related(mut self, related: BTreeMap<String, String>) -> Self {
        self.related = related;
        self
    }
}

/// Lists the entries of every distinct parent directory of `files`.
///
/// Paths are resolved against `root`. Directories that cannot be read are
/// skipped.
pub fn collect_directory_listings(files: &[String], root: &Path) -> BTreeMap<String, String> {
    let mut listings = BTreeMap::new();
    let mut visited = HashSet::new();

    for file in files {
        let dir = match Path::new(file).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
            _ => ".".to_string(),
        };
        if !visited.insert(dir.clone()) {
            continue;
        }

        let entries = match std::fs::read_dir(root.join(&dir)) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir, error = %e, "skipping unreadable directory");
                continue;
            }
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        listings.insert(dir, names.join(", "));
    }

    listings
}

/// Builds the full prompt for `request` under the style settings of `config`.
pub fn build_prompt(request: &CommitRequest, config: &Config) -> String {
    let mut blocks: Vec<String> = vec![RULES.to_string(), commit_type_block()];

    if config.emoji {
        blocks.push(emoji_block());
    }

    blocks.push(commit_info_block(request));

    if !request.related.is_empty() {
        blocks.push(related_block(&request.related));
    }

    if config.cot {
        blocks.push(chain_of_thought_block(config.emoji));
    }

    blocks.push(tagged(
        "I18n",
        &format!("You need to write it in {} language", config.locale()),
    ));
    blocks.push(output_template_block(config.emoji, config.cot));

    format!("{}\n{}", PREAMBLE, blocks.join("\n"))
}

fn tagged(name: &str, body: &str) -> String {
    format!("<{name}>\n{body}\n</{name}>")
}

fn commit_type_block() -> String {
    let lines: Vec<String> = COMMIT_TYPES
        .iter()
        .map(|(name, description, _)| {
            format!("{:<11} \"{}\"", format!("\"{}\":", name), description)
        })
        .collect();
    tagged("GitCommitType", &lines.join("\n"))
}

fn emoji_block() -> String {
    let lines: Vec<String> = COMMIT_TYPES
        .iter()
        .map(|(name, _, emoji)| format!("\"{}\": \"{}\"", name, emoji))
        .collect();
    tagged("GitCommitEmoji", &lines.join("\n"))
}

fn commit_info_block(request: &CommitRequest) -> String {
    let mut lines = Vec::new();
    if let Some(hint) = &request.user_hint {
        lines.push(format!("<UserInput> {} (write on this basis) </UserInput>", hint));
    }
    lines.push(format!(
        "<FilesChanged> {} </FilesChanged>",
        request.files.join(", ")
    ));
    lines.push(format!("<CodeDiff> {} </CodeDiff>", request.diff));
    tagged("CommitInfo", &lines.join("\n"))
}

fn related_block(related: &BTreeMap<String, String>) -> String {
    let lines: Vec<String> = related
        .iter()
        .map(|(dir, listing)| format!("{}: {}", dir, listing))
        .collect();
    tagged("RelatedFiles", &lines.join("\n"))
}

fn chain_of_thought_block(emoji: bool) -> String {
    let mut body = String::from(
        "Before the answer, write your chain of thought in the following format\n\
         <thinking>\n\
         1. what the code changed?\n\
         2. what the purpose of the change was?\n\
         3. what the type of the change was?\n",
    );
    if emoji {
        body.push_str("4. which emoji fits the change?\n");
    }
    body.push_str("</thinking>");
    tagged("ChainOfThought", &body)
}

fn output_template_block(emoji: bool, cot: bool) -> String {
    let lead = if cot {
        "After the thinking block, output only the following JSON structure, without any additional content"
    } else {
        "Output only the following JSON structure, without any additional content"
    };
    let mut fields = vec![
        "  \"typ\": \"(required) The type of git commit\"",
        "  \"msg\": \"(required) The subject of git commit\"",
        "  \"scope\": \"(optional) The scope of git commit\"",
    ];
    if emoji {
        fields.push("  \"emoji\": \"(optional) The emoji of git commit\"");
    }
    tagged(
        "OutputTemplate",
        &format!("{}\n{{\n{}\n}}", lead, fields.join(",\n")),
    )
}
