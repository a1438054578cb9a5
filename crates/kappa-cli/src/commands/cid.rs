use crate::cli::CidArgs;
use crate::error::Result;
use kappa::engine::complexity::{CidResult, compute_cid};
use kappa::engine::normalization::{NormalizationHarness, NormalizedResult};
use tracing::info;

/// Drops one trailing line terminator; sequence files are usually a single line.
fn strip_line_terminator(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

pub async fn run(args: CidArgs) -> Result<()> {
    info!("Reading sequence from {:?}", &args.file);
    let content = tokio::task::block_in_place(|| std::fs::read(&args.file))?;
    let symbols = strip_line_terminator(&content);

    let normalized = match args.n_shuffles {
        Some(n) => Some(tokio::task::block_in_place(|| {
            NormalizationHarness::new(n, args.seed).run(symbols)
        })?),
        None => None,
    };
    let original = match &normalized {
        Some(result) => result.original,
        None => compute_cid(symbols)?,
    };

    println!("{}", render(&original, normalized.as_ref(), &args));
    Ok(())
}

fn render(original: &CidResult, normalized: Option<&NormalizedResult>, args: &CidArgs) -> String {
    if args.tab {
        let mut line = format!(
            "{}\t{}\t{:.6}",
            original.sequence_length, original.factor_count, original.cid
        );
        if let Some(n) = normalized {
            line.push_str(&format!(
                "\t{:.6}\t{:.6}\t{:.6}",
                n.cid_shuffled_mean, n.cid_normalized, n.compression_gain
            ));
        }
        return line;
    }

    if args.breakdown {
        let mut lines = vec![
            format!("sequence length: {}", original.sequence_length),
            format!("factors:         {}", original.factor_count),
            format!("compressed bits: {:.3}", original.compressed_bits),
            format!("CID:             {:.6}", original.cid),
        ];
        if let Some(n) = normalized {
            lines.push(format!(
                "shuffled CID:    {:.6} ± {:.6} ({} shuffle(s))",
                n.cid_shuffled_mean,
                n.cid_shuffled_std,
                n.n_shuffles()
            ));
            lines.push(format!("normalized CID:  {:.6}", n.cid_normalized));
            lines.push(format!("gain:            {:.6}", n.compression_gain));
        }
        return lines.join("\n");
    }

    match normalized {
        Some(n) => format!("{:.6} {:.6}", original.cid, n.cid_normalized),
        None => format!("{:.6}", original.cid),
    }
}
