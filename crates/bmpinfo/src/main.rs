/*
    bitmap

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    crates/bmpinfo/src/main.rs

    A simple utility that reads a BMP file and prints its metadata.
    With --decode, the pixel data is decoded as well, validating the file.
*/
use bpaf::*;

use bitmap::{BmpCodec, ImageView};
use std::path::PathBuf;

#[derive(Debug, Clone)]
struct Out {
    decode: bool,
    filename: PathBuf,
}

/// Set up bpaf argument parsing.
fn opts() -> OptionParser<Out> {
    let decode = short('d')
        .long("decode")
        .help("Decode the pixel data to validate the file")
        .switch();

    let filename = short('t')
        .long("filename")
        .help("Filename of bitmap to read")
        .argument::<PathBuf>("FILE");

    construct!(Out { decode, filename })
        .to_options()
        .descr("bmpinfo: display info about a BMP file")
}

fn main() {
    env_logger::init();

    // Get the command line options.
    let opts = opts().run();

    let file = match std::fs::File::open(&opts.filename) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error opening file: {}", e);
            std::process::exit(1);
        }
    };

    let mut reader = std::io::BufReader::new(file);

    if !BmpCodec::detect(&mut reader) {
        eprintln!("{} is not a BMP file", opts.filename.display());
        std::process::exit(1);
    }

    let info = match BmpCodec::read_info(&mut reader) {
        Ok(info) => info,
        Err(e) => {
            eprintln!("Error reading bitmap header: {}", e);
            std::process::exit(1);
        }
    };

    println!("Bitmap info:");
    println!("------------");
    if let Err(e) = info.dump_info(&mut std::io::stdout()) {
        eprintln!("Error writing bitmap info: {}", e);
        std::process::exit(1);
    }

    if opts.decode {
        match ImageView::load(&mut reader) {
            Ok(image) => {
                log::debug!("Decoded {} bytes of pixel data", image.as_bytes().len());
                println!("Pixel data: OK ({}x{})", image.width(), image.height());
            }
            Err(e) => {
                eprintln!("Error decoding pixel data: {}", e);
                std::process::exit(1);
            }
        }
    }
}
