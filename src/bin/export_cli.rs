use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};

use ymap_tools_lib::scene::{load_snapshot, tree::write_scene_tree, FanTriangulator, SceneNode};
use ymap_tools_lib::validation::ExportReport;
use ymap_tools_lib::ymap::{export_many, write_document, ExportOptions, OutputFormat};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatArg {
    Xml,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xml => OutputFormat::Xml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Export map scene snapshots to ymap documents")]
struct Args {
    /// Scene snapshot files (JSON), one map root each
    #[arg(required = true)]
    snapshots: Vec<PathBuf>,

    /// Directory the exported maps are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// JSON file with export options
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    exclude_entities: bool,

    #[arg(long)]
    exclude_box_occluders: bool,

    #[arg(long)]
    exclude_model_occluders: bool,

    #[arg(long)]
    exclude_car_generators: bool,

    /// Output encoding
    #[arg(long, value_enum, default_value_t = FormatArg::Xml)]
    format: FormatArg,

    /// Print each snapshot's hierarchy before exporting
    #[arg(long)]
    print_tree: bool,
}

impl Args {
    fn export_options(&self) -> anyhow::Result<ExportOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let data = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&data)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => ExportOptions::default(),
        };
        options.exclude_entities |= self.exclude_entities;
        options.exclude_box_occluders |= self.exclude_box_occluders;
        options.exclude_model_occluders |= self.exclude_model_occluders;
        options.exclude_car_generators |= self.exclude_car_generators;
        Ok(options)
    }
}

fn load_roots(paths: &[PathBuf]) -> anyhow::Result<Vec<SceneNode>> {
    paths
        .iter()
        .map(|path| {
            load_snapshot(path).with_context(|| format!("loading snapshot {}", path.display()))
        })
        .collect()
}

fn output_path(out_dir: &Path, name: &str, format: OutputFormat) -> PathBuf {
    out_dir.join(format!("{}.{}", name, format.extension()))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let options = args.export_options()?;
    let format = OutputFormat::from(args.format);

    let mut roots = load_roots(&args.snapshots)?;

    if args.print_tree {
        let stdout = std::io::stdout();
        for root in &roots {
            write_scene_tree(root, stdout.lock())?;
        }
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let exports = export_many(&mut roots, &options, &FanTriangulator);

    let map_count = exports.len();
    let mut total = ExportReport::new();
    for export in exports {
        let path = output_path(&args.out_dir, &export.document.name, format);
        write_document(&export.document, &path, format)
            .with_context(|| format!("writing {}", path.display()))?;

        eprintln!(
            "{} -> {} ({} entities, {} box occluders, {} occlude models, {} car generators)",
            export.document.name,
            path.display(),
            export.document.entities.len(),
            export.document.box_occluders.len(),
            export.document.occlude_models.len(),
            export.document.car_generators.len()
        );
        total.merge(export.report);
    }

    eprintln!(
        "Exported {} map(s), {} warning(s), {} note(s)",
        map_count,
        total.warning_count,
        total.info_count
    );
    Ok(())
}
