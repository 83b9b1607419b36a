use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle phase named in a suite file's `fail` / `panic` lists.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScriptPhase {
    Prepare,
    SkipCheck,
    Before,
    Execute,
    After,
    CleanUp,
}

impl fmt::Display for ScriptPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScriptPhase::Prepare => "prepare",
            ScriptPhase::SkipCheck => "skip_check",
            ScriptPhase::Before => "before",
            ScriptPhase::Execute => "execute",
            ScriptPhase::After => "after",
            ScriptPhase::CleanUp => "clean_up",
        };
        f.write_str(name)
    }
}

/// One node of a suite file.
///
/// `children` are declared statically; `dynamic` nodes are registered by this
/// node while it executes. An empty `skip` string skips without a reason.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuiteNode {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fail: Vec<ScriptPhase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub panic: Vec<ScriptPhase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic: Vec<SuiteNode>,
    #[serde(default)]
    pub children: Vec<SuiteNode>,
}

impl SuiteNode {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            skip: None,
            fail: Vec::new(),
            panic: Vec::new(),
            dynamic: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, static and dynamic, including `self`.
    pub fn count(&self) -> usize {
        1 + self
            .children
            .iter()
            .chain(&self.dynamic)
            .map(SuiteNode::count)
            .sum::<usize>()
    }
}

/// Starter suite written by `runner init`.
pub fn default_suite() -> SuiteNode {
    let mut root = SuiteNode::new("suite", "Example suite");

    let mut math = SuiteNode::new("suite/math", "Math");
    math.children = vec![
        SuiteNode::new("suite/math/add", "adds numbers"),
        SuiteNode::new("suite/math/div", "divides numbers"),
    ];

    let mut generated = SuiteNode::new("suite/generated", "Generated cases");
    generated.dynamic = vec![
        SuiteNode::new("suite/generated/1", "case 1"),
        SuiteNode::new("suite/generated/2", "case 2"),
    ];

    let mut pending = SuiteNode::new("suite/pending", "Not yet implemented");
    pending.skip = Some("pending".to_string());

    root.children = vec![math, generated, pending];
    root
}
