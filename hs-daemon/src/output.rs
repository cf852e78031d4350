//! Data channel writer
//!
//! Each response is one JSON object plus `\n`, flushed immediately so the
//! parent's read returns without waiting on a buffer.

use std::io::{self, Write};

use hs_protocol::{error_line, Response};

pub fn write_response<W: Write + ?Sized>(out: &mut W, response: &Response) -> io::Result<()> {
    let line = match response.to_line() {
        Ok(line) => line,
        Err(e) => error_line(&e.to_string()),
    };
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}
