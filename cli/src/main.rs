//! a5kit CLI - reformat documents into A5 pages

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use a5kit::pdf::write_atomic;
use a5kit::{
    detect_input_kind, text_to_pdf, ColumnLayout, DocumentConverter, InputKind, Margins,
    OfficeConverter, Orientation, PageSelection, PageSize, PaperSize, PdftoppmRasterizer,
    Reformatter, RotationPolicy, SourcePdf, Strategy, TextLayoutOptions, TextStyle, TransformMode,
    TransformOptions,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "a5kit")]
#[command(version)]
#[command(about = "Reformat PDF, Word and text documents into A5 pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scale each page onto one A5 page
    Resize {
        /// Input PDF, DOC or DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <name>_a5.pdf next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Split each page into two A5 pages (left/right, or top/bottom in landscape)
    Split {
        /// Input PDF, DOC or DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <name>_a5.pdf next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Typeset a plain text file
    Text {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <name>_a5.pdf, or text_a5.pdf for stdin)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Title set above the text
        #[arg(long)]
        title: Option<String>,

        /// Body font size in points
        #[arg(long)]
        font_size: Option<f32>,

        /// Paragraph alignment
        #[arg(long, value_enum)]
        style: Option<StyleArg>,

        /// Column layout (two columns use A4 paper)
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,

        /// Draw page numbers
        #[arg(long, overrides_with = "no_page_numbers")]
        page_numbers: bool,

        /// Never draw page numbers
        #[arg(long)]
        no_page_numbers: bool,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Convert a Word document to PDF without reformatting
    Convert {
        /// Input DOC or DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <name>.pdf next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// LibreOffice binary
        #[arg(long, env = "A5KIT_SOFFICE", value_name = "PATH")]
        soffice: Option<PathBuf>,
    },

    /// Show page geometry of a PDF
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Page setup shared by every layout command.
#[derive(Args)]
struct PageArgs {
    /// JSON options file; flags given on the command line take precedence
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Margin on every side, in inches
    #[arg(long, value_name = "IN")]
    margin: Option<f32>,

    /// Top margin in inches
    #[arg(long, value_name = "IN")]
    margin_top: Option<f32>,

    /// Right margin in inches
    #[arg(long, value_name = "IN")]
    margin_right: Option<f32>,

    /// Bottom margin in inches
    #[arg(long, value_name = "IN")]
    margin_bottom: Option<f32>,

    /// Left margin in inches
    #[arg(long, value_name = "IN")]
    margin_left: Option<f32>,

    /// Target orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,
}

impl PageArgs {
    fn apply_margins(&self, mut margins: Margins) -> Margins {
        if let Some(all) = self.margin {
            margins = Margins::uniform(all);
        }
        if let Some(v) = self.margin_top {
            margins.top = v;
        }
        if let Some(v) = self.margin_right {
            margins.right = v;
        }
        if let Some(v) = self.margin_bottom {
            margins.bottom = v;
        }
        if let Some(v) = self.margin_left {
            margins.left = v;
        }
        margins
    }
}

/// Options for resize and split.
#[derive(Args)]
struct TransformArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Target paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// How page content is carried over
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Render resolution for the raster strategy
    #[arg(long)]
    dpi: Option<u32>,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Handling of rotated source pages
    #[arg(long, value_enum)]
    rotation: Option<RotationArg>,

    /// Shrink applied to the fitted scale, in (0, 1]
    #[arg(long)]
    safety_factor: Option<f32>,

    /// pdftoppm binary used by the raster strategy
    #[arg(long, env = "A5KIT_PDFTOPPM", value_name = "PATH")]
    pdftoppm: Option<PathBuf>,

    /// LibreOffice binary used for Word input
    #[arg(long, env = "A5KIT_SOFFICE", value_name = "PATH")]
    soffice: Option<PathBuf>,
}

impl TransformArgs {
    fn to_options(&self) -> CliResult<TransformOptions> {
        let mut options: TransformOptions = load_options(self.page.options.as_deref())?;

        options.margins = self.page.apply_margins(options.margins);
        if let Some(orientation) = self.page.orientation {
            options.orientation = orientation.into();
        }
        if let Some(paper) = self.paper {
            options.paper = paper.into();
        }
        if let Some(strategy) = self.strategy {
            options.strategy = strategy.into();
        }
        if let Some(dpi) = self.dpi {
            options.dpi = dpi;
        }
        if let Some(ref pages) = self.pages {
            options.pages =
                PageSelection::parse(pages).map_err(|e| format!("Invalid page range: {}", e))?;
        }
        if let Some(rotation) = self.rotation {
            options.rotation = rotation.into();
        }
        if let Some(factor) = self.safety_factor {
            options.safety_factor = Some(factor);
        }

        options.validate()?;
        Ok(options)
    }

    fn reformatter(&self) -> CliResult<Reformatter> {
        let mut rasterizer = PdftoppmRasterizer::new();
        if let Some(ref path) = self.pdftoppm {
            rasterizer = rasterizer.with_binary(path);
        }

        let mut reformatter = Reformatter::new()
            .with_options(self.to_options()?)
            .with_rasterizer(rasterizer);

        if let Some(ref path) = self.soffice {
            reformatter =
                reformatter.with_converter(Arc::new(OfficeConverter::new().with_binary(path)));
        }
        Ok(reformatter)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Orientation::Portrait,
            OrientationArg::Landscape => Orientation::Landscape,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PaperArg {
    A4,
    A5,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => PaperSize::A4,
            PaperArg::A5 => PaperSize::A5,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Render to a bitmap and redraw (default)
    RasterRedraw,
    /// Keep vector content, clip split halves
    VectorMerge,
    /// Historical split without cropping (for comparison only)
    VectorSplitCropTranslate,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::RasterRedraw => Strategy::RasterRedraw,
            StrategyArg::VectorMerge => Strategy::VectorMerge,
            StrategyArg::VectorSplitCropTranslate => Strategy::VectorSplitCropTranslate,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum RotationArg {
    /// Lay out pages as displayed
    Normalize,
    /// Fail on rotated pages
    Reject,
    /// Disregard /Rotate
    Ignore,
}

impl From<RotationArg> for RotationPolicy {
    fn from(arg: RotationArg) -> Self {
        match arg {
            RotationArg::Normalize => RotationPolicy::Normalize,
            RotationArg::Reject => RotationPolicy::Reject,
            RotationArg::Ignore => RotationPolicy::Ignore,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StyleArg {
    Normal,
    Justified,
    Centered,
}

impl From<StyleArg> for TextStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Normal => TextStyle::Normal,
            StyleArg::Justified => TextStyle::Justified,
            StyleArg::Centered => TextStyle::Centered,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    Single,
    Double,
}

impl From<LayoutArg> for ColumnLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Single => ColumnLayout::Single,
            LayoutArg::Double => ColumnLayout::Double,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Resize {
            input,
            output,
            transform,
        }) => cmd_transform(&input, output.as_deref(), &transform, TransformMode::Resize),
        Some(Commands::Split {
            input,
            output,
            transform,
        }) => cmd_transform(&input, output.as_deref(), &transform, TransformMode::Split),
        Some(Commands::Text {
            input,
            output,
            title,
            font_size,
            style,
            layout,
            page_numbers,
            no_page_numbers,
            page,
        }) => {
            let page_numbers = match (page_numbers, no_page_numbers) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            cmd_text(
                &input,
                output.as_deref(),
                TextFlags {
                    title,
                    font_size,
                    style,
                    layout,
                    page_numbers,
                },
                &page,
            )
        }
        Some(Commands::Convert {
            input,
            output,
            soffice,
        }) => cmd_convert(&input, output.as_deref(), soffice),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: a5kit <COMMAND> <FILE>".yellow());
            println!("       a5kit --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    pb
}

fn load_options<T>(path: Option<&Path>) -> CliResult<T>
where
    T: Default + serde::de::DeserializeOwned,
{
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Cannot read options file {}: {}", path.display(), e))?;
            Ok(serde_json::from_str(&text)
                .map_err(|e| format!("Invalid options file {}: {}", path.display(), e))?)
        }
        None => Ok(T::default()),
    }
}

fn default_output(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}{}.pdf", stem, suffix))
}

fn cmd_transform(
    input: &Path,
    output: Option<&Path>,
    args: &TransformArgs,
    mode: TransformMode,
) -> CliResult<()> {
    let reformatter = args.reformatter()?;
    log::debug!("Options: {:?}", reformatter.options());
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input, "_a5"));

    let verb = match mode {
        TransformMode::Resize => "Resizing",
        TransformMode::Split => "Splitting",
    };
    let pb = spinner(&format!("{} {}...", verb, input.display()));

    let result = reformatter.process(input, mode);
    let document = match result {
        Ok(document) => document,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    pb.set_message("Writing output...");
    document.write_to(&output)?;
    pb.finish_and_clear();

    let options = reformatter.options();
    println!(
        "{} {} ({} page(s), {} {}, {})",
        "Saved to".green(),
        output.display(),
        document.page_count(),
        options.paper,
        orientation_name(options.orientation),
        options.strategy.name()
    );
    Ok(())
}

struct TextFlags {
    title: Option<String>,
    font_size: Option<f32>,
    style: Option<StyleArg>,
    layout: Option<LayoutArg>,
    page_numbers: Option<bool>,
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    flags: TextFlags,
    page: &PageArgs,
) -> CliResult<()> {
    let from_stdin = input.as_os_str() == "-";
    let text = if from_stdin {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        match detect_input_kind(input)? {
            InputKind::Text => fs::read_to_string(input)?,
            other => {
                return Err(format!(
                    "{} is not plain text ({:?}); use resize or split",
                    input.display(),
                    other
                )
                .into())
            }
        }
    };

    let mut options: TextLayoutOptions = load_options(page.options.as_deref())?;
    options.margins = page.apply_margins(options.margins);
    if let Some(orientation) = page.orientation {
        options.orientation = orientation.into();
    }
    if let Some(title) = flags.title {
        options = options.with_title(title);
    }
    if let Some(size) = flags.font_size {
        options.font_size = size;
    }
    if let Some(style) = flags.style {
        options.text_style = style.into();
    }
    if let Some(layout) = flags.layout {
        options.layout = layout.into();
    }
    if flags.page_numbers.is_some() {
        options.page_numbers = flags.page_numbers;
    }

    let output = output.map(Path::to_path_buf).unwrap_or_else(|| {
        if from_stdin {
            PathBuf::from("text_a5.pdf")
        } else {
            default_output(input, "_a5")
        }
    });

    let document = text_to_pdf(&text, &options)?;
    document.write_to(&output)?;

    println!(
        "{} {} ({} page(s))",
        "Saved to".green(),
        output.display(),
        document.page_count()
    );
    Ok(())
}

fn cmd_convert(input: &Path, output: Option<&Path>, soffice: Option<PathBuf>) -> CliResult<()> {
    let mut converter = OfficeConverter::new();
    if let Some(path) = soffice {
        converter = converter.with_binary(path);
    }
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input, ""));

    let pb = spinner(&format!("Converting {}...", input.display()));
    let result = converter.convert(input);
    pb.finish_and_clear();
    let bytes = result?;

    write_atomic(&output, &bytes)?;
    println!("{} {}", "Saved to".green(), output.display());
    Ok(())
}

fn cmd_info(input: &Path) -> CliResult<()> {
    let source = SourcePdf::open(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), source.version());
    println!("{}: {}", "Pages".bold(), source.page_count());

    println!();
    println!("{}", "Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for page in source.pages()? {
        let size = page.display_size();
        let rotation = if page.is_rotated() {
            format!(", rotated {}", page.rotation)
        } else {
            String::new()
        };
        println!(
            "  {:>4}  {:.0} x {:.0} pt ({:.0} x {:.0} mm){}{}",
            page.number,
            size.width,
            size.height,
            size.width / a5kit::geometry::POINTS_PER_MM,
            size.height / a5kit::geometry::POINTS_PER_MM,
            paper_label(size),
            rotation
        );
    }

    Ok(())
}

fn paper_label(size: PageSize) -> String {
    let close = |a: PageSize, b: PageSize| {
        (a.width - b.width).abs() < 2.0 && (a.height - b.height).abs() < 2.0
    };
    for paper in [PaperSize::A4, PaperSize::A5] {
        let portrait = paper.size();
        if close(size, portrait) || close(size, portrait.swapped()) {
            return format!(" {}", paper.name().dimmed());
        }
    }
    String::new()
}

fn orientation_name(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Portrait => "portrait",
        Orientation::Landscape => "landscape",
    }
}

fn cmd_version() {
    println!("{} {}", "a5kit".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Reformat documents into A5 pages");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_resize() {
        let cli = Cli::try_parse_from([
            "a5kit",
            "resize",
            "in.pdf",
            "--margin",
            "0.25",
            "--orientation",
            "landscape",
            "--strategy",
            "vector-merge",
            "--pages",
            "1-2",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Resize { transform, .. }) => {
                let options = transform.to_options().unwrap();
                assert_eq!(options.margins, Margins::uniform(0.25));
                assert_eq!(options.orientation, Orientation::Landscape);
                assert_eq!(options.strategy, Strategy::VectorMerge);
                assert_eq!(options.pages, PageSelection::Range(1..=2));
            }
            _ => panic!("expected resize"),
        }
    }

    #[test]
    fn test_flags_override_options_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opts.json");
        fs::write(&path, r#"{"dpi": 300, "margins": {"top": 1.0}}"#).unwrap();

        let cli = Cli::try_parse_from([
            "a5kit",
            "split",
            "in.pdf",
            "--options",
            path.to_str().unwrap(),
            "--margin-top",
            "0.75",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Split { transform, .. }) => {
                let options = transform.to_options().unwrap();
                assert_eq!(options.dpi, 300);
                assert_eq!(options.margins.top, 0.75);
                assert_eq!(options.margins.left, 0.5);
            }
            _ => panic!("expected split"),
        }
    }

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output(Path::new("/docs/report.docx"), "_a5"),
            PathBuf::from("/docs/report_a5.pdf")
        );
    }

    #[test]
    fn test_invalid_page_range() {
        let cli =
            Cli::try_parse_from(["a5kit", "resize", "in.pdf", "--pages", "3-1"]).unwrap();
        match cli.command {
            Some(Commands::Resize { transform, .. }) => assert!(transform.to_options().is_err()),
            _ => panic!("expected resize"),
        }
    }
}
