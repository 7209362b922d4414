//! Status line parsing
//!
//! Every reply starts with `<3-digit code> <free text>`.

use std::fmt;

use crate::error::{DictError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    code: u16,
    detail: String,
}

impl StatusLine {
    /// Splits on the first space only; the remainder, possibly empty, is the detail.
    pub fn parse(line: &str) -> Result<Self> {
        let (code, detail) = line
            .split_once(' ')
            .ok_or_else(|| DictError::MalformedStatus(line.to_string()))?;

        let bytes = code.as_bytes();
        let well_formed = bytes.len() == 3
            && (b'1'..=b'5').contains(&bytes[0])
            && bytes[1..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(DictError::MalformedStatus(line.to_string()));
        }

        let code = code
            .parse()
            .map_err(|_| DictError::MalformedStatus(line.to_string()))?;

        Ok(Self {
            code,
            detail: detail.to_string(),
        })
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Fails with `UnexpectedStatus` unless the code is `expected`.
    pub fn expect(self, expected: u16) -> Result<Self> {
        if self.code == expected {
            Ok(self)
        } else {
            Err(DictError::unexpected(&[expected], self.code, &self.detail))
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.detail)
    }
}
