// Java source rendering
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of uibinder.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Render the Java source representation into a byte stream via
//!   [`Write`].

use super::{
    ClassDecl, CompilationUnit, DeclKind, Expr, Member, MethodDecl, Stmt,
};
use crate::xml::escape::escape_java_string;
use std::io::{Error as IoError, ErrorKind, Result, Write};

const INDENT: &[u8] = b"  ";

/// Indentation-aware sink for generated source.
///
/// Indentation is written lazily at the start of each non-empty line,
///   so that blank lines contain no trailing whitespace.
pub struct SourceWriter<W: Write> {
    sink: W,
    depth: usize,
    at_line_start: bool,
}

impl<W: Write> SourceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            depth: 0,
            at_line_start: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub fn text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        if self.at_line_start {
            for _ in 0..self.depth {
                self.sink.write_all(INDENT)?;
            }
            self.at_line_start = false;
        }

        self.sink.write_all(text.as_bytes())
    }

    pub fn end_line(&mut self) -> Result<()> {
        self.sink.write_all(b"\n")?;
        self.at_line_start = true;
        Ok(())
    }

    /// Write a complete line.
    pub fn line(&mut self, text: &str) -> Result<()> {
        self.text(text)?;
        self.end_line()
    }

    /// Open a brace-delimited block at the end of the current line.
    pub fn open_block(&mut self) -> Result<()> {
        self.text(" {")?;
        self.end_line()?;
        self.depth += 1;
        Ok(())
    }

    /// Close a block on its own line,
    ///   leaving the cursor after the closing brace.
    pub fn close_block(&mut self) -> Result<()> {
        if !self.at_line_start {
            self.end_line()?;
        }
        self.depth = self.depth.saturating_sub(1);
        self.text("}")
    }
}

/// Write a Java source representation.
pub trait JavaWriter {
    fn write<W: Write>(&self, out: &mut SourceWriter<W>) -> Result<()>;

    /// Allocate a new buffer and write into it.
    fn write_new(&self) -> Result<Vec<u8>> {
        let mut out = SourceWriter::new(Vec::new());
        self.write(&mut out)?;
        Ok(out.into_inner())
    }

    /// Render into a [`String`].
    fn to_source(&self) -> Result<String> {
        String::from_utf8(self.write_new()?)
            .map_err(|e| IoError::new(ErrorKind::InvalidData, e))
    }
}

impl JavaWriter for Expr {
    fn write<W: Write>(&self, out: &mut SourceWriter<W>) -> Result<()> {
        match self {
            Self::Null => out.text("null"),
            Self::Literal(lit) => out.text(lit),
            Self::Str(s) => out.text(&format!("\"{}\"", escape_java_string(s))),
            Self::Name(name) => out.text(name),
            Self::ClassLiteral(ty) => out.text(&format!("{ty}.class")),

            Self::Call {
                target,
                method,
                args,
            } => {
                if let Some(target) = target {
                    write_operand(target, out)?;
                    out.text(".")?;
                }
                out.text(method)?;
                write_args(args, out)
            }

            Self::New { ty, args } => {
                out.text(&format!("new {ty}"))?;
                write_args(args, out)
            }

            Self::Anonymous { ty, methods } => {
                out.text(&format!("new {ty}()"))?;
                out.open_block()?;
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        out.end_line()?;
                    }
                    method.write(out)?;
                    out.end_line()?;
                }
                out.close_block()
            }

            Self::Cast { ty, expr } => {
                out.text(&format!("({ty}) "))?;
                write_operand(expr, out)
            }

            Self::Concat(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        out.text(" + ")?;
                    }
                    part.write(out)?;
                }
                Ok(())
            }
        }
    }
}

fn write_operand<W: Write>(
    expr: &Expr,
    out: &mut SourceWriter<W>,
) -> Result<()> {
    if expr.needs_parens() {
        out.text("(")?;
        expr.write(out)?;
        out.text(")")
    } else {
        expr.write(out)
    }
}

fn write_args<W: Write>(args: &[Expr], out: &mut SourceWriter<W>) -> Result<()> {
    out.text("(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.text(", ")?;
        }
        arg.write(out)?;
    }
    out.text(")")
}

impl JavaWriter for Stmt {
    fn write<W: Write>(&self, out: &mut SourceWriter<W>) -> Result<()> {
        match self {
            Self::Expr(expr) => expr.write(out)?,
            Self::Local {
                is_final,
                ty,
                name,
                init,
            } => {
                if *is_final {
                    out.text("final ")?;
                }
                out.text(&format!("{ty} {name} = "))?;
                init.write(out)?;
            }
            Self::Assign { target, value } => {
                target.write(out)?;
                out.text(" = ")?;
                value.write(out)?;
            }
            Self::Return(expr) => {
                out.text("return ")?;
                expr.write(out)?;
            }
        }

        out.text(";")
    }
}

impl JavaWriter for MethodDecl {
    fn write<W: Write>(&self, out: &mut SourceWriter<W>) -> Result<()> {
        for annotation in self.annotations.iter() {
            out.line(annotation)?;
        }

        out.text(&self.signature())?;

        match &self.body {
            None => out.text(";"),
            Some(body) => {
                out.open_block()?;
                for stmt in body {
                    stmt.write(out)?;
                    out.end_line()?;
                }
                out.close_block()
            }
        }
    }
}

impl JavaWriter for ClassDecl {
    fn write<W: Write>(&self, out: &mut SourceWriter<W>) -> Result<()> {
        for annotation in self.annotations.iter() {
            out.line(annotation)?;
        }

        for modifier in self.modifiers.iter() {
            out.text(modifier)?;
            out.text(" ")?;
        }

        out.text(match self.kind {
            DeclKind::Class => "class ",
            DeclKind::Interface => "interface ",
        })?;
        out.text(&self.name)?;

        if !self.extends.is_empty() {
            out.text(&format!(" extends {}", self.extends.join(", ")))?;
        }
        if !self.implements.is_empty() {
            out.text(&format!(" implements {}", self.implements.join(", ")))?;
        }

        out.open_block()?;

        for member in self.members.iter() {
            out.end_line()?;

            match member {
                Member::Method(method) => method.write(out)?,
                Member::Class(class) => class.write(out)?,
            }

            out.end_line()?;
        }

        out.close_block()
    }
}

impl JavaWriter for CompilationUnit {
    fn write<W: Write>(&self, out: &mut SourceWriter<W>) -> Result<()> {
        if !self.package.is_empty() {
            out.line(&format!("package {};", self.package))?;
            out.end_line()?;
        }

        if !self.imports.is_empty() {
            for import in self.imports.iter() {
                out.line(&format!("import {import};"))?;
            }
            out.end_line()?;
        }

        self.class.write(out)?;
        out.end_line()
    }
}
