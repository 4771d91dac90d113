//! Command-line arguments.

use clap::{Parser, Subcommand};
use studio_core::request::{
    ColorScheme, Industry, LogoRequest, LogoStyle, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use studio_core::types::LogoId;

/// Generate logos and turn them into short videos.
#[derive(Parser, Debug)]
#[command(name = "logo-studio")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Backend origin. Overrides `STUDIO_API_URL`.
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate logos from a prompt and print the gallery
    Generate(GenerateArgs),

    /// Convert an image URL into a video
    Convert {
        /// Image to convert
        #[arg(value_name = "IMAGE_URL")]
        image_url: String,

        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print placeholder gallery records
    Sample {
        /// Number of records
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Description of the logo
    #[arg(short, long)]
    pub prompt: String,

    /// Colour scheme (vibrant, pastel, monochrome, earthy)
    #[arg(long)]
    pub color: Option<ColorScheme>,

    /// Industry (technology, finance, healthcare, education)
    #[arg(long)]
    pub industry: Option<Industry>,

    /// Style (minimalist, vintage, futuristic, handdrawn)
    #[arg(long)]
    pub style: Option<LogoStyle>,

    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Convert the generated logo with this id once generation finishes
    #[arg(long, value_name = "ID")]
    pub convert: Option<LogoId>,

    /// Print the gallery (and conversion result) as JSON
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    pub fn to_request(&self) -> LogoRequest {
        let mut request = LogoRequest::new(self.prompt.clone()).with_size(self.width, self.height);
        request.color = self.color;
        request.industry = self.industry;
        request.style = self.style;
        request
    }
}
