//! Output formatting for the `srcidx` binary

use crate::graph::{DependencyAnalysisResult, ImpactAnalysisResult, ImportOptimization};
use crate::index::stats::IndexStatistics;
use crate::index::types::SourceDocument;
use std::io::{self, Write};
use std::sync::Arc;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print one matching document per line: path, then package when known
pub fn print_documents(docs: &[Arc<SourceDocument>], color: bool) -> io::Result<()> {
    let mut out = stdout(color);
    write_documents(&mut out, docs)
}

pub fn write_documents<W: WriteColor>(out: &mut W, docs: &[Arc<SourceDocument>]) -> io::Result<()> {
    for doc in docs {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{}", doc.path)?;
        out.reset()?;

        if let Some(package) = doc.package_name() {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(out, " ({})", package)?;
            out.reset()?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Print only the number of matches (for --count)
pub fn print_count(count: usize) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", count)
}

pub fn print_statistics(stats: &IndexStatistics) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "Index Statistics")?;
    writeln!(out, "================")?;
    writeln!(out)?;
    writeln!(out, "Documents:        {}", stats.total_files)?;
    writeln!(out, "Content tokens:   {}", stats.unique_tokens)?;
    writeln!(out, "Types:            {}", stats.unique_types)?;
    writeln!(out, "Packages:         {}", stats.unique_packages)?;
    writeln!(out, "Methods:          {}", stats.unique_methods)?;
    writeln!(out, "Imports:          {}", stats.unique_imports)?;
    Ok(())
}

/// Print each cycle as `A -> B -> C -> A`, followed by a summary line
pub fn print_cycles(result: &DependencyAnalysisResult, color: bool) -> io::Result<()> {
    let mut out = stdout(color);
    write_cycles(&mut out, result)
}

pub fn write_cycles<W: WriteColor>(out: &mut W, result: &DependencyAnalysisResult) -> io::Result<()> {
    for cycle in result.cycles() {
        let Some(first) = cycle.first() else {
            continue;
        };
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(out, "cycle")?;
        out.reset()?;
        writeln!(out, ": {} -> {}", cycle.join(" -> "), first)?;
    }

    writeln!(
        out,
        "{} documents, {} references, {} cycles",
        result.graph().node_count(),
        result.edge_count(),
        result.cycles().len()
    )
}

/// Print each impacted document with the reason it is affected
pub fn print_impact(result: &ImpactAnalysisResult, color: bool) -> io::Result<()> {
    let mut out = stdout(color);
    write_impact(&mut out, result)
}

pub fn write_impact<W: WriteColor>(out: &mut W, result: &ImpactAnalysisResult) -> io::Result<()> {
    for (path, reason) in result.impacted() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{}", path)?;
        out.reset()?;
        writeln!(out, ": {}", reason)?;
    }
    writeln!(
        out,
        "{} documents affected by {}",
        result.len(),
        result.changed_type()
    )
}

pub fn print_import_optimization(result: &ImportOptimization) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_import_optimization(&mut out, result)
}

pub fn write_import_optimization<W: Write>(out: &mut W, result: &ImportOptimization) -> io::Result<()> {
    for import in &result.unused {
        writeln!(out, "unused: {}", import)?;
    }
    for import in &result.wildcards {
        writeln!(out, "wildcard: {}", import)?;
    }
    for call in &result.static_candidates {
        writeln!(out, "static import candidate: {}", call)?;
    }
    writeln!(out)?;
    for import in &result.optimized {
        writeln!(out, "import {};", import)?;
    }
    Ok(())
}
