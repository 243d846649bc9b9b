use af_recorder::{write_csv_header, write_csv_row, FrameReader, RecorderFrame, INTERFACE_VERSION};
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fdr2csv")]
#[command(about = "Converts flight data recorder files to delimited text", long_about = None)]
struct Args {
    /// Input file
    #[arg(short = 'i', long = "in")]
    in_file: Option<PathBuf>,

    /// Output file
    #[arg(short = 'o', long = "out")]
    out_file: Option<PathBuf>,

    /// Delimiter
    #[arg(short = 'd', long = "delimiter", default_value = ",")]
    delimiter: String,

    /// Input file is not compressed
    #[arg(short = 'n', long = "no-compression")]
    no_compression: bool,

    /// Print struct size
    #[arg(short = 'p', long = "print-struct-size")]
    print_struct_size: bool,

    /// Print interface version of input file
    #[arg(short = 'g', long = "get-input-file-version")]
    get_input_file_version: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.print_struct_size {
        println!(
            "frame size = {} bytes ({} fields), interface version = {}",
            RecorderFrame::SIZE_BYTES,
            RecorderFrame::FIELD_COUNT,
            INTERFACE_VERSION
        );
        return ExitCode::SUCCESS;
    }

    let Some(in_file) = &args.in_file else {
        println!("Input file parameter missing!");
        return ExitCode::FAILURE;
    };
    if !in_file.exists() {
        println!("Input file does not exist!");
        return ExitCode::FAILURE;
    }
    if args.out_file.is_none() && !args.get_input_file_version {
        println!("Output file parameter missing!");
        return ExitCode::FAILURE;
    }

    let mut reader = match FrameReader::open(in_file, !args.no_compression) {
        Ok(reader) => reader,
        Err(err) => {
            println!("Failed to open input file! ({err})");
            return ExitCode::FAILURE;
        }
    };

    if args.get_input_file_version {
        println!("{}", reader.version());
        return ExitCode::SUCCESS;
    }

    if let Err(err) = reader.check_version() {
        println!("ERROR: {err}");
        return ExitCode::FAILURE;
    }

    let out_file = args.out_file.expect("checked above");
    println!(
        "Converting from '{}' to '{}' with interface version '{}' and delimiter '{}'",
        in_file.display(),
        out_file.display(),
        reader.version(),
        args.delimiter
    );

    let out = match File::create(&out_file) {
        Ok(file) => file,
        Err(_) => {
            println!("Failed to create output file!");
            return ExitCode::FAILURE;
        }
    };
    let mut out = BufWriter::new(out);

    if let Err(err) = write_csv_header(&mut out, &args.delimiter) {
        println!("Failed to write output file! ({err})");
        return ExitCode::FAILURE;
    }

    let mut counter = 0u64;
    loop {
        match reader.next_frame() {
            Ok(Some(frame)) => {
                if let Err(err) = write_csv_row(&mut out, &args.delimiter, &frame) {
                    println!("Failed to write output file! ({err})");
                    return ExitCode::FAILURE;
                }
                counter += 1;
                if counter % 1000 == 0 {
                    print!("Processed {counter} entries...\r");
                    let _ = std::io::stdout().flush();
                }
            }
            Ok(None) => break,
            Err(err) => {
                println!("Failed to read input file! ({err})");
                return ExitCode::FAILURE;
            }
        }
    }

    println!("Processed {counter} entries...");
    ExitCode::SUCCESS
}
