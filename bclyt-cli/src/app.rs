use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// bclyt - inspect, dump, translate and verify 3DS BCLYT layouts
#[derive(Debug, Parser)]
#[command(name = "bclyt", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Display layout overview: origin, canvas size, resource tables and counts.
    Info {
        /// Path to the .bclyt file.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Print the panel tree with kinds, positions and sizes.
    Tree {
        /// Path to the .bclyt file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Also print the group tree.
        #[arg(long)]
        groups: bool,
    },

    /// Export the structural dump (JSON) and/or the string catalog (PO).
    Export {
        /// Path to the .bclyt file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Write the structural dump to this file.
        #[arg(long, value_name = "OUT.json")]
        dump: Option<PathBuf>,

        /// Write the string catalog to this file.
        #[arg(long, value_name = "OUT.po")]
        po: Option<PathBuf>,
    },

    /// Apply a structural dump and/or a string catalog to a layout and write the result.
    Import {
        /// Path to the original .bclyt file.
        #[arg(value_name = "ORIGINAL")]
        original: PathBuf,

        /// Structural dump to apply.
        #[arg(long, value_name = "IN.json")]
        dump: Option<PathBuf>,

        /// String catalog to apply.
        #[arg(long, value_name = "IN.po")]
        po: Option<PathBuf>,

        /// Where to write the new layout.
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,
    },

    /// Export dump and catalog for every .bclyt below a directory.
    ExportDir {
        /// Directory to scan recursively.
        #[arg(value_name = "IN")]
        input: PathBuf,

        /// Directory receiving <name>.json and <name>.po, mirroring the input tree.
        #[arg(value_name = "OUT")]
        output: PathBuf,
    },

    /// Import dumps and catalogs for every .bclyt below a directory.
    ImportDir {
        /// Directory with the original layouts.
        #[arg(value_name = "ORIGINAL")]
        original: PathBuf,

        /// Directory with <name>.json and/or <name>.po files, mirroring the original tree.
        #[arg(value_name = "IN")]
        input: PathBuf,

        /// Directory receiving the new layouts.
        #[arg(value_name = "OUT")]
        output: PathBuf,
    },

    /// Decode and re-encode a layout and check the result is byte-identical.
    Verify {
        /// Path to a .bclyt file, or a directory to scan recursively.
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}
