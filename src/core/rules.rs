//! The ordered conversion rule table
//!
//! Rules are applied top-to-bottom; declaration order is the application
//! order. Later rules depend on earlier substitutions (brace-grouping
//! simplifications must run before the residual strip pass in
//! [`crate::core::protect`]), so the table is a fixed ordered list rather
//! than a keyed map.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Where in the pipeline a rule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// Inside `$$...$$` regions only
    DisplayMath,
    /// Inside `$...$` regions only
    InlineMath,
    /// Inside both math kinds, and once over the whole segment
    Global,
}

/// Which pass of the engine is asking for rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulePass {
    /// Content of a `$$...$$` region
    Display,
    /// Content of a `$...$` region
    Inline,
    /// The whole segment text, outside math
    Segment,
}

impl RuleScope {
    fn applies_in(self, pass: RulePass) -> bool {
        match self {
            RuleScope::Global => true,
            RuleScope::DisplayMath => pass == RulePass::Display,
            RuleScope::InlineMath => pass == RulePass::Inline,
        }
    }
}

/// How a rule rewrites its matches
pub enum Replacement {
    /// Regex replacement template with `${n}` capture references
    Template(&'static str),
    /// Computed replacement
    Transform(fn(&Captures) -> String),
}

/// One entry of the ordered rule table
pub struct ConversionRule {
    pub name: &'static str,
    pub pattern: &'static str,
    pub replacement: Replacement,
    pub scope: RuleScope,
}

// =============================================================================
// Symbol table
// =============================================================================

/// LaTeX command name (without backslash) to Unicode symbol.
///
/// Unknown commands are left untouched by the symbol rule and fall through
/// to the residual strip pass.
pub static SYMBOLS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    // Greek letters
    "alpha" => "α", "beta" => "β", "gamma" => "γ", "delta" => "δ",
    "epsilon" => "ε", "varepsilon" => "ε", "zeta" => "ζ", "eta" => "η",
    "theta" => "θ", "vartheta" => "ϑ", "iota" => "ι", "kappa" => "κ",
    "lambda" => "λ", "mu" => "μ", "nu" => "ν", "xi" => "ξ", "pi" => "π",
    "varpi" => "ϖ", "rho" => "ρ", "varrho" => "ϱ", "sigma" => "σ",
    "varsigma" => "ς", "tau" => "τ", "upsilon" => "υ", "phi" => "φ",
    "varphi" => "ϕ", "chi" => "χ", "psi" => "ψ", "omega" => "ω",
    "Gamma" => "Γ", "Delta" => "Δ", "Theta" => "Θ", "Lambda" => "Λ",
    "Xi" => "Ξ", "Pi" => "Π", "Sigma" => "Σ", "Upsilon" => "Υ",
    "Phi" => "Φ", "Psi" => "Ψ", "Omega" => "Ω",
    // Comparison and set operators
    "leq" => "≤", "le" => "≤", "geq" => "≥", "ge" => "≥", "neq" => "≠",
    "ne" => "≠", "approx" => "≈", "equiv" => "≡", "sim" => "∼",
    "ll" => "≪", "gg" => "≫", "propto" => "∝",
    "pm" => "±", "mp" => "∓", "times" => "×", "div" => "÷", "cdot" => "·",
    "in" => "∈", "notin" => "∉", "ni" => "∋",
    "subset" => "⊂", "supset" => "⊃", "subseteq" => "⊆", "supseteq" => "⊇",
    "cup" => "∪", "cap" => "∩", "setminus" => "∖",
    "emptyset" => "∅", "varnothing" => "∅",
    "forall" => "∀", "exists" => "∃", "nexists" => "∄",
    "neg" => "¬", "land" => "∧", "wedge" => "∧", "lor" => "∨", "vee" => "∨",
    "oplus" => "⊕", "otimes" => "⊗", "perp" => "⊥", "parallel" => "∥",
    "angle" => "∠", "therefore" => "∴", "because" => "∵",
    // Calculus and big operators
    "infty" => "∞", "partial" => "∂", "nabla" => "∇",
    "sum" => "∑", "prod" => "∏", "int" => "∫", "oint" => "∮",
    // Arrows
    "rightarrow" => "→", "to" => "→", "leftarrow" => "←", "gets" => "←",
    "Rightarrow" => "⇒", "implies" => "⇒", "Leftarrow" => "⇐",
    "leftrightarrow" => "↔", "Leftrightarrow" => "⇔", "iff" => "⇔",
    "mapsto" => "↦", "uparrow" => "↑", "downarrow" => "↓",
    // Dots and misc
    "cdots" => "⋯", "ldots" => "…", "dots" => "…", "vdots" => "⋮",
    "ddots" => "⋱", "prime" => "′", "circ" => "∘", "bullet" => "•",
    "degree" => "°", "aleph" => "ℵ", "hbar" => "ℏ", "ell" => "ℓ",
    "Re" => "ℜ", "Im" => "ℑ", "wp" => "℘",
};

/// Commands consumed by non-symbol rules; used by the `check` analysis to
/// tell handled commands apart from ones the strip pass will remove.
pub const HANDLED_COMMANDS: &[&str] = &[
    "frac", "sqrt", "textbf", "mathbf", "textit", "mathit", "emph",
    "underline", "operatorname", "text", "textrm", "mathrm", "begin", "end",
    "item", "left", "right", "quad", "qquad", "displaystyle",
];

/// Whether a command name is recognized by the rule table.
pub fn is_known_command(name: &str) -> bool {
    SYMBOLS.contains_key(name) || HANDLED_COMMANDS.contains(&name)
}

// =============================================================================
// Transforms
// =============================================================================

fn replace_symbol(caps: &Captures) -> String {
    match SYMBOLS.get(&caps[1]) {
        Some(symbol) => (*symbol).to_string(),
        None => caps[0].to_string(),
    }
}

fn list_items(body: &str) -> Vec<String> {
    body.split("\\item")
        .skip(1)
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn replace_itemize(caps: &Captures) -> String {
    let mut out = String::from("\n");
    for item in list_items(&caps[1]) {
        out.push_str("- ");
        out.push_str(&item);
        out.push('\n');
    }
    out
}

fn replace_enumerate(caps: &Captures) -> String {
    let mut out = String::from("\n");
    for (idx, item) in list_items(&caps[1]).iter().enumerate() {
        out.push_str(&format!("{}. {}\n", idx + 1, item));
    }
    out
}

// The display pass wraps the whole region in a fenced block, so the aligned
// body is emitted as plain lines: alignment tabs dropped, `\\` as newlines.
fn replace_aligned(caps: &Captures) -> String {
    let mut out = String::new();
    for line in caps[1].split("\\\\") {
        let line = line.replace('&', "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str(line);
    }
    out.push('\n');
    out
}

// =============================================================================
// The table
// =============================================================================

/// The ordered rule table. Order is a correctness requirement: symbols are
/// substituted before parametrized commands, block environments before the
/// grouping and spacing cleanups. Parametrized rules only match single-level
/// brace groups, so the outer-argument rules (fraction) come after the ones
/// that typically nest inside them (sqrt, text).
pub static RULES: &[ConversionRule] = &[
    ConversionRule {
        name: "symbol",
        pattern: r"\\([a-zA-Z]+)",
        replacement: Replacement::Transform(replace_symbol),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "bold",
        pattern: r"\\(?:textbf|mathbf)\s*\{([^{}]*)\}",
        replacement: Replacement::Template("**${1}**"),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "italic",
        pattern: r"\\(?:textit|mathit|emph)\s*\{([^{}]*)\}",
        replacement: Replacement::Template("*${1}*"),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "underline",
        pattern: r"\\underline\s*\{([^{}]*)\}",
        replacement: Replacement::Template("<u>${1}</u>"),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "operatorname",
        pattern: r"\\operatorname\s*\{([^{}]*)\}",
        replacement: Replacement::Template("${1}"),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "text",
        pattern: r"\\(?:textrm|text|mathrm)\s*\{([^{}]*)\}",
        replacement: Replacement::Template("${1}"),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "sqrt",
        pattern: r"\\sqrt\s*\{([^{}]*)\}",
        replacement: Replacement::Template("√${1}"),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "fraction",
        pattern: r"\\frac\s*\{([^{}]*)\}\s*\{([^{}]*)\}",
        replacement: Replacement::Template("${1}/${2}"),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "itemize",
        pattern: r"(?s)\\begin\{itemize\}(.*?)\\end\{itemize\}",
        replacement: Replacement::Transform(replace_itemize),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "enumerate",
        pattern: r"(?s)\\begin\{enumerate\}(.*?)\\end\{enumerate\}",
        replacement: Replacement::Transform(replace_enumerate),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "aligned",
        pattern: r"(?s)\\begin\{aligned\}(.*?)\\end\{aligned\}",
        replacement: Replacement::Transform(replace_aligned),
        scope: RuleScope::DisplayMath,
    },
    // \left. and \right. are invisible delimiters; drop the dot with them.
    ConversionRule {
        name: "left-invisible",
        pattern: r"\\left\b\s*\.",
        replacement: Replacement::Template(""),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "right-invisible",
        pattern: r"\\right\b\s*\.",
        replacement: Replacement::Template(""),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "left",
        pattern: r"\\left\b\s*",
        replacement: Replacement::Template(""),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "right",
        pattern: r"\\right\b\s*",
        replacement: Replacement::Template(""),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "displaystyle",
        pattern: r"\\displaystyle\b\s*",
        replacement: Replacement::Template(""),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "wide-space",
        pattern: r"\\(?:qquad|quad)\b\s*",
        replacement: Replacement::Template(" "),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "thin-space",
        pattern: r"\\[,;: ]",
        replacement: Replacement::Template(" "),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "negative-space",
        pattern: r"\\!",
        replacement: Replacement::Template(""),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "escaped-char",
        pattern: r"\\([{}%&#_$])",
        replacement: Replacement::Template("${1}"),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "subsup-braces",
        pattern: r"([_^])\{([A-Za-z0-9]+)\}",
        replacement: Replacement::Template("${1}${2}"),
        scope: RuleScope::Global,
    },
    ConversionRule {
        name: "linebreak-display",
        pattern: r"\\\\[ \t]*",
        replacement: Replacement::Template("\n"),
        scope: RuleScope::DisplayMath,
    },
    ConversionRule {
        name: "linebreak-inline",
        pattern: r"\\\\[ \t]*",
        replacement: Replacement::Template(" "),
        scope: RuleScope::InlineMath,
    },
    ConversionRule {
        name: "alignment-tab",
        pattern: r"[ \t]*&[ \t]*",
        replacement: Replacement::Template(" "),
        scope: RuleScope::DisplayMath,
    },
];

// =============================================================================
// Compiled table
// =============================================================================

/// A rule with its pattern compiled
pub struct CompiledRule {
    pub rule: &'static ConversionRule,
    regex: Regex,
}

impl CompiledRule {
    fn apply(&self, input: &str) -> String {
        match &self.rule.replacement {
            Replacement::Template(template) => {
                self.regex.replace_all(input, *template).into_owned()
            }
            Replacement::Transform(transform) => self
                .regex
                .replace_all(input, |caps: &Captures| transform(caps))
                .into_owned(),
        }
    }
}

/// The rule table with patterns compiled once.
///
/// A rule whose pattern fails to compile is dropped from `rules` and
/// recorded in `skipped`; no rule failure is fatal to a conversion.
pub struct RuleTable {
    rules: Vec<CompiledRule>,
    pub skipped: Vec<(&'static str, String)>,
}

impl RuleTable {
    fn compile(source: &'static [ConversionRule]) -> Self {
        let mut rules = Vec::with_capacity(source.len());
        let mut skipped = Vec::new();
        for rule in source {
            match Regex::new(rule.pattern) {
                Ok(regex) => rules.push(CompiledRule { rule, regex }),
                Err(err) => skipped.push((rule.name, err.to_string())),
            }
        }
        RuleTable { rules, skipped }
    }

    /// Apply every rule in scope for `pass`, in table order.
    pub fn apply(&self, content: &str, pass: RulePass) -> String {
        let mut current = content.to_string();
        for compiled in &self.rules {
            if compiled.rule.scope.applies_in(pass) {
                current = compiled.apply(&current);
            }
        }
        current
    }

    /// Number of rules that compiled.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

lazy_static! {
    /// The compiled rule table, shared and immutable once constructed.
    pub static ref RULE_TABLE: RuleTable = RuleTable::compile(RULES);
}
