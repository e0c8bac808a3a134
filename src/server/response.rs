//! Transport implementation over `may_minihttp` responses.

use std::io;

use may_minihttp::Response;

use crate::context::Transport;

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

impl Transport for Response<'_> {
    fn send(&mut self, status: u16, headers: &[(String, String)], body: Vec<u8>) -> io::Result<()> {
        self.status_code(status as usize, status_reason(status));
        for (name, value) in headers {
            // may_minihttp keeps header lines as &'static str, so buffered
            // dynamic headers have to be leaked for the write.
            let line = format!("{name}: {value}").into_boxed_str();
            self.header(Box::leak(line));
        }
        self.body_mut().extend_from_slice(&body);
        Ok(())
    }
}
