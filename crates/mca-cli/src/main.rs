use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use mca_core::model::{AddonType, ContentItem, Project};

#[derive(Parser, Debug)]
#[command(
    name = "mca-cli",
    about = "Build, preview, and export Minecraft Bedrock add-on projects",
    version
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print a fresh project JSON with default manifest and no items
    Init(InitArgs),
    /// Print a fresh content item JSON for the given type
    New(NewArgs),
    /// Read behavior JSON text and print the extracted structure facts
    Preview(PreviewArgs),
    /// Read a project JSON and write the packaged .mcaddon archive
    Export(ExportArgs),
    /// Zip an existing unpacked add-on directory into a .mcaddon
    Pack(PackArgs),
    /// Generate behavior/resource JSON for an item via the AI service
    Generate(GenerateArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TypeArg {
    Entity,
    Item,
    Block,
    Recipe,
}

impl From<TypeArg> for AddonType {
    fn from(t: TypeArg) -> Self {
        match t {
            TypeArg::Entity => AddonType::Entity,
            TypeArg::Item => AddonType::Item,
            TypeArg::Block => AddonType::Block,
            TypeArg::Recipe => AddonType::Recipe,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct InitArgs {
    /// Optional output path; otherwise prints to stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct NewArgs {
    /// Content type of the new item
    #[arg(value_enum)]
    content_type: TypeArg,
}

#[derive(ClapArgs, Debug)]
struct PreviewArgs {
    /// File holding the behavior JSON text
    path: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct ExportArgs {
    /// Project JSON (manifest + items)
    project: PathBuf,
    /// Output archive path; defaults to the manifest-derived name in cwd
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct PackArgs {
    /// Directory holding the unpacked "<Name> BP" / "<Name> RP" trees
    dir: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct GenerateArgs {
    /// Content type to generate for
    #[arg(value_enum)]
    content_type: TypeArg,
    /// Item name
    #[arg(long)]
    name: String,
    /// Free-text description of what the item should do
    #[arg(long)]
    description: String,
    /// Override the model id
    #[arg(long)]
    model: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Init(a) => cmd_init(a),
        Cmd::New(a) => cmd_new(a),
        Cmd::Preview(a) => cmd_preview(a),
        Cmd::Export(a) => cmd_export(a),
        Cmd::Pack(a) => cmd_pack(a),
        Cmd::Generate(a) => cmd_generate(a),
    }
}

fn cmd_init(args: InitArgs) {
    let project = Project::new();
    let text = serde_json::to_string_pretty(&project).unwrap();
    match args.out {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, text) {
                eprintln!("error writing: {}", e);
                std::process::exit(2);
            }
            println!("wrote {}", path.display());
        }
        None => println!("{}", text),
    }
}

fn cmd_new(args: NewArgs) {
    let item = ContentItem::new(args.content_type.into());
    println!("{}", serde_json::to_string_pretty(&item).unwrap());
}

fn cmd_preview(args: PreviewArgs) {
    let text = std::fs::read_to_string(&args.path).unwrap_or_else(|e| {
        eprintln!("error reading {}: {}", args.path.display(), e);
        std::process::exit(2);
    });
    let p = mca_core::extract(&text);
    let out = serde_json::json!({
        "parsed_ok": p.parsed_ok,
        "root_key": p.root_key,
        "identifier": p.identifier,
        "health": p.health(),
        "movement_speed": p.movement_speed(),
        "tool": p.is_tool(),
        "consumable": p.is_consumable(),
        "components": serde_json::Value::Object(p.components.clone()),
    });
    println!("{}", serde_json::to_string_pretty(&out).unwrap());
}

fn cmd_export(args: ExportArgs) {
    let data = std::fs::read_to_string(&args.project).unwrap_or_else(|e| {
        eprintln!("error reading project: {}", e);
        std::process::exit(2);
    });
    let project: Project = serde_json::from_str(&data).unwrap_or_else(|e| {
        eprintln!("invalid project JSON: {}", e);
        std::process::exit(3);
    });
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(mca_core::suggested_file_name(&project.manifest)));
    match mca_core::export_to_file(&project, &out) {
        Ok(_) => println!("wrote {}", out.display()),
        Err(e) => {
            eprintln!("export error: {}", e);
            std::process::exit(4);
        }
    }
}

fn cmd_pack(args: PackArgs) {
    match mca_core::pack_addon_dir(&args.dir) {
        Ok(dest) => println!("wrote {}", dest.display()),
        Err(e) => {
            eprintln!("pack error: {}", e);
            std::process::exit(2);
        }
    }
}

fn cmd_generate(args: GenerateArgs) {
    if args.name.trim().is_empty() || args.description.trim().is_empty() {
        eprintln!("a name and description are required before generation");
        std::process::exit(2);
    }
    let mut client = mca_core::GenerationClient::from_env().unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    if let Some(model) = args.model {
        client = client.with_model(model);
    }
    match client.generate(args.content_type.into(), &args.name, &args.description) {
        Ok(generated) => println!("{}", serde_json::to_string_pretty(&generated).unwrap()),
        Err(e) => {
            eprintln!("generation failed: {}", e);
            std::process::exit(3);
        }
    }
}
