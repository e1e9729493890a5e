//! Custload demo - generate sample CSV files and run the full pipeline
//!
//! ```bash
//! custload              # generate samples, parse them, print the report
//! custload --keep       # leave the generated files on disk afterwards
//! custload --dir ./out  # generate into ./out instead of the temp dir
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;

use custload::{ErrorSink, ParserRegistry, StaticPhoneDirectory};

#[derive(Parser)]
#[command(name = "custload")]
#[command(about = "Parse heterogeneous customer CSV files into normalized records", long_about = None)]
struct Cli {
    /// Directory for the generated sample files (defaults to a temp directory)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Keep the generated sample files instead of removing them
    #[arg(long)]
    keep: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_demo(cli).await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_demo(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // A user-supplied directory is left in place; the temp default is
    // removed after the run unless --keep asks otherwise.
    let (dir, ephemeral) = match cli.dir {
        Some(dir) => (dir, false),
        None => (
            std::env::temp_dir().join(format!("custload-demo-{}", std::process::id())),
            true,
        ),
    };
    fs::create_dir_all(&dir)?;

    println!("🚀 Custload demo");
    println!("📁 Sample files: {}", dir.display());
    println!();

    let samples = write_sample_files(&dir)?;

    let directory = StaticPhoneDirectory::empty()
        .with_number("CUST003", "+15550134987")
        .with_number("EMP101", "+8613912345678");
    let registry = ParserRegistry::new(Arc::new(directory));

    let mut sink = ErrorSink::new();
    let mut total_records = 0;

    for (tag, path) in &samples {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        println!("📄 {} (as {})", file_name, tag);

        if let Some(detected) = registry.detect(path) {
            println!("   Detected structure: {}", detected.tag());
        }

        let parser = registry.create(tag)?;
        let errors_before = sink.len();
        let records = parser.parse(path, &mut sink).await;
        let new_errors = sink.len() - errors_before;

        if new_errors == 0 {
            println!("✅ {} records, no errors", records.len());
        } else {
            println!("⚠️  {} records, {} new errors", records.len(), new_errors);
        }
        if !records.is_empty() {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        println!();

        total_records += records.len();
    }

    println!(
        "📊 {} records parsed across {} files",
        total_records,
        samples.len()
    );
    println!();
    println!("{}", sink.report());

    if ephemeral && !cli.keep {
        fs::remove_dir_all(&dir)?;
    } else {
        println!();
        println!("📁 Sample files kept at {}", dir.display());
    }

    Ok(())
}

/// Writes the three sample formats plus one file that does not match the
/// structure it is offered to. Returns (format tag, path) pairs in parse
/// order.
fn write_sample_files(dir: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
    let samples = [
        (
            "format-a",
            "customers_a.csv",
            "CustomerID,Full Name,Email,Phone,Salary\n\
             CUST001,John Doe,john.doe@email.com,+1234567890,75000\n\
             CUST002,jane smith,JANE.SMITH@EMAIL.COM,+1987654321,82000.50\n\
             CUST003,robert brown,robert.brown@email.com,,68000\n",
        ),
        (
            "format-b",
            "employees_b.csv",
            "ID,Name,Surname,CorporateEmail,PersonalEmail,Salary\n\
             EMP001,Alice,Brown,alice.brown@company.com,alice.b@home.net,90000\n\
             EMP002,carlos,mendez,Carlos.Mendez@Company.com,carlos@personal.org,77500\n\
             EMP003,Bruno,Klein,bruno.klein@company.com,,71000\n",
        ),
        (
            "format-c",
            "staff_c.csv",
            "EmployeeID,FirstName,LastName,WorkEmail,Phone,Salary,Department\n\
             EMP100,maria,garcia,maria.garcia@work.org,+34600111222,64000,Engineering\n\
             EMP101,li,wei,li.wei@work.org,,71000,Research\n\
             EMP102,sara,connor,sara.connor@work.org,,59000,Sales\n",
        ),
        // Missing the "Full Name" column, so the format-a parser must
        // reject the whole file with a structure error.
        (
            "format-a",
            "legacy_export.csv",
            "CustomerID,Name,Email,Phone,Salary\n\
             CUST900,John Doe,john.doe@email.com,+1234567890,75000\n",
        ),
    ];

    let mut paths = Vec::new();
    for (tag, file_name, content) in samples {
        let path = dir.join(file_name);
        fs::write(&path, content)?;
        paths.push((tag.to_string(), path));
    }
    Ok(paths)
}
