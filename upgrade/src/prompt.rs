// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Interactive prompt for replacement names
//!
//! The operator is asked until a name passes both checks. There is no retry
//! limit: a person is on the other end and may take as many tries as needed.

use log::debug;
use std::collections::HashSet;
use std::io::{self, BufRead, Write};

use crate::error::{Result, UpgradeError};

/// Prefix reserved for Dgraph's own predicates and types
pub const RESERVED_PREFIX: &str = "dgraph.";

pub const RESERVED_NAME_MSG: &str = "new name can't start with `dgraph.`, please try again! ";
pub const EXISTING_NAME_MSG: &str =
    "new name can't be same as a name in existing schema, please try again! ";

/// Default reservation check
pub fn is_reserved_name(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

/// States of one prompt session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptState {
    Prompting,
    AwaitingInput,
    ScanFailed(String),
    RejectedReserved,
    RejectedDuplicate,
    Accepted(String),
}

/// Asks for a new name for `old_name` over injected input and output
pub struct NamePrompt<'a, R, W, F> {
    input: R,
    output: W,
    old_name: &'a str,
    is_reserved: F,
    existing: &'a HashSet<String>,
    state: PromptState,
}

impl<'a, R, W, F> NamePrompt<'a, R, W, F>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> bool,
{
    pub fn new(
        input: R,
        output: W,
        old_name: &'a str,
        is_reserved: F,
        existing: &'a HashSet<String>,
    ) -> Self {
        Self {
            input,
            output,
            old_name,
            is_reserved,
            existing,
            state: PromptState::Prompting,
        }
    }

    pub fn state(&self) -> &PromptState {
        &self.state
    }

    /// Advance one transition. Fails only on output errors or closed input.
    pub fn step(&mut self) -> Result<&PromptState> {
        let next = match &self.state {
            PromptState::Prompting => {
                write!(self.output, "Enter new name for `{}`: ", self.old_name)?;
                self.output.flush()?;
                PromptState::AwaitingInput
            }
            PromptState::AwaitingInput => match read_token(&mut self.input) {
                Ok(Some(name)) => self.check(name),
                Ok(None) => return Err(UpgradeError::InputClosed(self.old_name.to_string())),
                Err(e) => PromptState::ScanFailed(e.to_string()),
            },
            PromptState::ScanFailed(reason) => {
                writeln!(
                    self.output,
                    "Something went wrong while scanning input:  {}",
                    reason
                )?;
                writeln!(self.output, "Try again!")?;
                PromptState::Prompting
            }
            PromptState::RejectedReserved => {
                writeln!(self.output, "{}", RESERVED_NAME_MSG)?;
                PromptState::Prompting
            }
            PromptState::RejectedDuplicate => {
                writeln!(self.output, "{}", EXISTING_NAME_MSG)?;
                PromptState::Prompting
            }
            PromptState::Accepted(name) => PromptState::Accepted(name.clone()),
        };

        self.state = next;
        Ok(&self.state)
    }

    fn check(&self, name: String) -> PromptState {
        if (self.is_reserved)(&name) {
            debug!("Rejected reserved name '{}'", name);
            PromptState::RejectedReserved
        } else if self.existing.contains(&name) {
            debug!("Rejected existing name '{}'", name);
            PromptState::RejectedDuplicate
        } else {
            PromptState::Accepted(name)
        }
    }

    /// Step until a name is accepted
    pub fn run(mut self) -> Result<String> {
        loop {
            if let PromptState::Accepted(name) = self.step()? {
                return Ok(name.clone());
            }
        }
    }
}

/// Prompt on `output` and read names from `input` until one is neither
/// reserved nor already present in `existing`.
pub fn ask_for_new_name<R, W, F>(
    input: R,
    output: W,
    old_name: &str,
    is_reserved: F,
    existing: &HashSet<String>,
) -> Result<String>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> bool,
{
    NamePrompt::new(input, output, old_name, is_reserved, existing).run()
}

/// Next whitespace-delimited token, `None` at end of input
fn read_token<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut token = Vec::new();

    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if buf.is_empty() {
            break;
        }

        let mut used = 0;
        let mut complete = false;
        for &byte in buf {
            used += 1;
            if byte.is_ascii_whitespace() {
                if token.is_empty() {
                    continue;
                }
                complete = true;
                break;
            }
            token.push(byte);
        }
        reader.consume(used);

        if complete {
            break;
        }
    }

    if token.is_empty() {
        return Ok(None);
    }
    String::from_utf8(token)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
