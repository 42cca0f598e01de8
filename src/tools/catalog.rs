//! The tool catalog: which tools exist and how each one is installed.
//!
//! Built-in tools come from two static tables, one per installation method.
//! Names are unique across both tables, so a name maps to exactly one
//! [`InstallMethod`]. Project config can override built-ins or add new tools.

use std::fmt;
use std::path::PathBuf;

use crate::config::{EdabootConfig, ToolConfig, ToolMethod};

/// Version flag used when a tool does not override it.
pub const DEFAULT_VERSION_FLAG: &str = "--version";

/// Directory of bundled installer scripts, relative to the project root.
pub const RECIPE_DIR: &str = "scripts/recipes";

struct PackageDef {
    name: &'static str,
    display_name: &'static str,
    version_flag: &'static str,
    banner: Option<&'static str>,
    hint: Option<&'static str>,
}

/// Package-manager tools, in install-all order.
const PACKAGE_DEFS: &[PackageDef] = &[
    PackageDef {
        name: "iverilog",
        display_name: "Icarus Verilog",
        version_flag: "-v",
        banner: Some("Icarus Verilog version"),
        hint: None,
    },
    PackageDef {
        name: "gtkwave",
        display_name: "GTKWave",
        version_flag: DEFAULT_VERSION_FLAG,
        banner: Some("GTKWave Analyzer v"),
        hint: None,
    },
    PackageDef {
        name: "klayout",
        display_name: "KLayout",
        version_flag: DEFAULT_VERSION_FLAG,
        banner: Some("KLayout"),
        hint: None,
    },
    PackageDef {
        name: "magic",
        display_name: "Magic",
        version_flag: DEFAULT_VERSION_FLAG,
        banner: Some("Magic"),
        hint: None,
    },
    PackageDef {
        name: "netgen",
        display_name: "Netgen",
        version_flag: DEFAULT_VERSION_FLAG,
        banner: Some("Netgen"),
        hint: None,
    },
    PackageDef {
        name: "openfpgaloader",
        display_name: "openFPGALoader",
        version_flag: DEFAULT_VERSION_FLAG,
        banner: Some("openFPGALoader"),
        hint: None,
    },
    PackageDef {
        name: "code",
        display_name: "VS Code",
        version_flag: DEFAULT_VERSION_FLAG,
        banner: None,
        hint: Some("You can run VS Code using 'code' from your terminal."),
    },
];

struct ScriptDef {
    name: &'static str,
    display_name: &'static str,
    bin_dir: &'static str,
    extra_paths: &'static [(&'static str, &'static str)],
}

/// Script tools, in install-all order.
const SCRIPT_DEFS: &[ScriptDef] = &[
    ScriptDef {
        name: "verilator",
        display_name: "Verilator",
        bin_dir: "verilator",
        extra_paths: &[],
    },
    ScriptDef {
        name: "openroad",
        display_name: "OpenROAD",
        bin_dir: "openroad",
        extra_paths: &[],
    },
    ScriptDef {
        name: "nextpnr",
        display_name: "nextpnr",
        bin_dir: "nextpnr",
        extra_paths: &[],
    },
    ScriptDef {
        name: "symbiyosys",
        display_name: "SymbiYosys",
        bin_dir: "sby",
        extra_paths: &[],
    },
    ScriptDef {
        name: "vivado",
        display_name: "Vivado",
        bin_dir: "vivado",
        extra_paths: &[],
    },
    ScriptDef {
        name: "yosys",
        display_name: "Yosys",
        bin_dir: "yosys",
        // The yosys recipe also builds the Slang frontend
        extra_paths: &[("Slang", "slang")],
    },
];

/// `$HOME/.local/<dir>/bin`, kept unexpanded so the activation script
/// resolves it at source time.
pub fn local_bin_path(dir: &str) -> String {
    format!("$HOME/.local/{}/bin", dir)
}

/// Default installer script for a script tool.
pub fn default_script_path(tool: &str) -> PathBuf {
    PathBuf::from(RECIPE_DIR).join(format!("{}.sh", tool))
}

/// How a built-in tool is installed, if `name` is built in.
pub fn builtin_method(name: &str) -> Option<ToolMethod> {
    if PACKAGE_DEFS.iter().any(|d| d.name == name) {
        Some(ToolMethod::Package)
    } else if SCRIPT_DEFS.iter().any(|d| d.name == name) {
        Some(ToolMethod::Script)
    } else {
        None
    }
}

/// A directory to export on PATH, with the label used in the marker comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub label: String,
    pub path: String,
}

impl PathEntry {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// Everything needed to install a tool from a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRecipe {
    /// Installer script, relative to the project root unless absolute
    pub script: PathBuf,
    /// The tool's own bin directory, exported after install
    pub bin_path: PathEntry,
    /// Directories exported alongside `bin_path`
    pub extra_paths: Vec<PathEntry>,
}

impl ScriptRecipe {
    /// Every directory to export, own bin directory first.
    pub fn exported_paths(&self) -> impl Iterator<Item = &PathEntry> {
        std::iter::once(&self.bin_path).chain(self.extra_paths.iter())
    }
}

/// How a tool is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallMethod {
    /// OS package manager install and query
    PackageManager,
    /// Installer script plus PATH persistence
    Script(ScriptRecipe),
}

impl InstallMethod {
    /// Short name used by `list --method` and config.
    pub fn kind(&self) -> ToolMethod {
        match self {
            Self::PackageManager => ToolMethod::Package,
            Self::Script(_) => ToolMethod::Script,
        }
    }
}

impl fmt::Display for ToolMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package => write!(f, "package"),
            Self::Script => write!(f, "script"),
        }
    }
}

/// One installable tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolEntry {
    /// Identifier used on the command line and in the selection file
    pub name: String,
    /// Human-readable label
    pub display_name: String,
    pub method: InstallMethod,
    /// Flag passed when probing the version
    pub version_flag: String,
    /// Substring that marks the version line in probe output
    pub banner: Option<String>,
    /// Shown after a successful install
    pub hint: Option<String>,
}

impl ToolEntry {
    fn from_package_def(def: &PackageDef) -> Self {
        Self {
            name: def.name.to_string(),
            display_name: def.display_name.to_string(),
            method: InstallMethod::PackageManager,
            version_flag: def.version_flag.to_string(),
            banner: def.banner.map(str::to_string),
            hint: def.hint.map(str::to_string),
        }
    }

    fn from_script_def(def: &ScriptDef) -> Self {
        Self {
            name: def.name.to_string(),
            display_name: def.display_name.to_string(),
            method: InstallMethod::Script(ScriptRecipe {
                script: default_script_path(def.name),
                bin_path: PathEntry::new(def.display_name, local_bin_path(def.bin_dir)),
                extra_paths: def
                    .extra_paths
                    .iter()
                    .map(|(label, dir)| PathEntry::new(*label, local_bin_path(dir)))
                    .collect(),
            }),
            version_flag: DEFAULT_VERSION_FLAG.to_string(),
            banner: None,
            hint: None,
        }
    }

    fn from_config(name: &str, config: &ToolConfig) -> Self {
        let mut entry = Self {
            name: name.to_string(),
            display_name: name.to_string(),
            method: InstallMethod::PackageManager,
            version_flag: DEFAULT_VERSION_FLAG.to_string(),
            banner: None,
            hint: None,
        };
        entry.apply(config);
        entry
    }

    /// Whether this tool is installed by a script.
    pub fn is_script(&self) -> bool {
        matches!(self.method, InstallMethod::Script(_))
    }

    /// The script recipe, for script tools.
    pub fn recipe(&self) -> Option<&ScriptRecipe> {
        match &self.method {
            InstallMethod::Script(recipe) => Some(recipe),
            InstallMethod::PackageManager => None,
        }
    }

    /// Overlay config fields on this entry.
    fn apply(&mut self, config: &ToolConfig) {
        if let Some(display_name) = &config.display_name {
            self.display_name = display_name.clone();
        }
        if let Some(flag) = &config.version_flag {
            self.version_flag = flag.clone();
        }
        if config.banner.is_some() {
            self.banner = config.banner.clone();
        }

        match config.method.unwrap_or_else(|| self.method.kind()) {
            ToolMethod::Package => self.method = InstallMethod::PackageManager,
            ToolMethod::Script => {
                let mut recipe = self.recipe().cloned().unwrap_or_else(|| ScriptRecipe {
                    script: default_script_path(&self.name),
                    bin_path: PathEntry::new(&self.display_name, local_bin_path(&self.name)),
                    extra_paths: Vec::new(),
                });
                if let Some(script) = &config.script {
                    recipe.script = script.clone();
                }
                if let Some(bin_dir) = &config.bin_dir {
                    recipe.bin_path.path = bin_dir.clone();
                }
                recipe.bin_path.label = self.display_name.clone();
                if !config.extra_paths.is_empty() {
                    recipe.extra_paths = config
                        .extra_paths
                        .iter()
                        .map(|p| PathEntry::new(&p.label, &p.path))
                        .collect();
                }
                self.method = InstallMethod::Script(recipe);
            }
        }
    }
}

/// The ordered set of known tools.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<ToolEntry>,
}

impl Catalog {
    /// The built-in tools only.
    pub fn builtin() -> Self {
        let entries = PACKAGE_DEFS
            .iter()
            .map(ToolEntry::from_package_def)
            .chain(SCRIPT_DEFS.iter().map(ToolEntry::from_script_def))
            .collect();
        Self { entries }
    }

    /// Built-in tools with project overrides applied.
    ///
    /// Overrides keep the tool's position; new tools are appended by name.
    pub fn from_config(config: &EdabootConfig) -> Self {
        let mut catalog = Self::builtin();
        for (name, tool) in &config.tools {
            match catalog.entries.iter_mut().find(|e| &e.name == name) {
                Some(entry) => entry.apply(tool),
                None => catalog.entries.push(ToolEntry::from_config(name, tool)),
            }
        }
        catalog
    }

    /// Look up a tool.
    ///
    /// Exact match first. Script tools also match case-insensitively, which
    /// is looser than strict membership: `Verilator` resolves to `verilator`.
    /// Package tools match exactly, so `GTKWave` is unknown.
    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        if let Some(entry) = self.entries.iter().find(|e| e.name == name) {
            return Some(entry);
        }
        let lowered = name.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.is_script() && e.name == lowered)
    }

    /// All tools, package-manager tools first, each group in table order.
    pub fn entries(&self) -> impl Iterator<Item = &ToolEntry> {
        let (packages, scripts): (Vec<_>, Vec<_>) =
            self.entries.iter().partition(|e| !e.is_script());
        packages.into_iter().chain(scripts)
    }

    /// Tool names in install-all order.
    pub fn names(&self) -> Vec<&str> {
        self.entries().map(|e| e.name.as_str()).collect()
    }

    /// Tools installed by the given method.
    pub fn by_method(&self, method: ToolMethod) -> impl Iterator<Item = &ToolEntry> {
        self.entries().filter(move |e| e.method.kind() == method)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
