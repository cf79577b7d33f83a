use anyhow::{bail, Context};
use dotenvy::dotenv;
use sketchify_web::{
    init_logging, validate_and_build, ConversionResult, FormState, HttpTransport, PageConfig,
    SelectedFile, Transport, ValidationError,
};
use std::env;
use std::path::Path;

fn media_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: cargo run --example submit_image -- <IMAGE> [CONVERSION_TYPE] [RESOLUTION] [WIDTH HEIGHT]"
        );
        eprintln!("Set SKETCHIFY_BASE_URL (or put it in .env); defaults to http://127.0.0.1:5000.");
        return Ok(());
    }

    let path = Path::new(&args[1]);
    let conversion_type = args.get(2).map(String::as_str).unwrap_or("monochrome_glow");
    let resolution = args.get(3).map(String::as_str).unwrap_or("original");
    let form = FormState::new(conversion_type, resolution).with_custom_size(
        args.get(4).cloned().unwrap_or_default(),
        args.get(5).cloned().unwrap_or_default(),
    );

    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let file = SelectedFile::new(name, media_type_for(path), data);

    let config = PageConfig::default();
    let request = match validate_and_build(file, &form) {
        Ok(request) => request,
        Err(err @ ValidationError::NotAnImage { .. }) => {
            bail!("{} ({})", config.not_an_image_message, err)
        }
        Err(err @ ValidationError::InvalidCustomSize { .. }) => {
            bail!("{} ({})", config.invalid_size_message, err)
        }
    };

    let base_url =
        env::var("SKETCHIFY_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    let transport = HttpTransport::new(reqwest::Client::new(), &base_url, &config.upload_path)?;
    println!("Uploading {} to {}", request.source.name, transport.endpoint());

    match transport.submit(request).await {
        Ok(ConversionResult::Converted(output)) => {
            println!("{}", output.message_or(&config.default_success_message));
            println!("  original: {}", output.input_url);
            println!("  result:   {}", output.output_url);
            println!("  download: {}", output.download_url);
        }
        Ok(ConversionResult::Failed { error }) => {
            eprintln!("Server error: {}", error);
        }
        Err(err) => {
            eprintln!("{}", config.transport_failure_message);
            eprintln!("  cause: {}", err);
        }
    }

    Ok(())
}
