//! Recognized `Compilation` options (spec §6.2's table), mirroring the
//! plain-struct-plus-`new()` shape `preprocessor::PreprocessorOptions` uses
//! rather than a builder.

/// Keyword/grammar generation the parser should accept. Only tracked for
/// now — `grammar` doesn't yet branch on it, since every example and
/// boundary scenario in scope targets 2017-equivalent syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageVersion {
    V1800_2005,
    V1800_2009,
    V1800_2012,
    V1800_2017,
    V1800_2023,
}

#[derive(Debug, Clone)]
pub struct CompilationOptions {
    pub language_version: LanguageVersion,
    pub max_include_depth: u32,
    pub max_macro_depth: u32,
    pub max_constexpr_depth: u32,
    pub default_timescale: Option<(String, String)>,
    pub default_nettype: String,
    pub include_dirs_user: Vec<String>,
    pub include_dirs_system: Vec<String>,
    pub predefined_macros: Vec<(String, String)>,
    pub allow_hierarchical_in_const: bool,
}

impl CompilationOptions {
    pub fn new() -> Self {
        CompilationOptions {
            language_version: LanguageVersion::V1800_2017,
            max_include_depth: 1024,
            max_macro_depth: 32,
            max_constexpr_depth: 128,
            default_timescale: None,
            default_nettype: "wire".to_string(),
            include_dirs_user: Vec::new(),
            include_dirs_system: Vec::new(),
            predefined_macros: Vec::new(),
            allow_hierarchical_in_const: false,
        }
    }
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self::new()
    }
}
