use std::{
    io::{BufRead, Write, stdin, stdout},
    str::FromStr,
    sync::Arc,
};

use miette::{IntoDiagnostic, Result, miette};
use strum::EnumString;

use table_catalog::{
    CatalogConfig, Column, CreateOptions, MemoryCatalog, TableFilter, TableSchema, Tables,
    catalog::config::PROJECT_ENV,
};

const DEFAULT_PROJECT: &str = "default";

const HELP: &str = "\
create <name> <col:type,...> [partitioned <col:type,...>] [comment <text>]
desc <name>
exists <name>
drop <name>
list [prefix]
comment <name> <text>
exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum Command {
    Create,
    #[strum(serialize = "desc", serialize = "describe")]
    Desc,
    Exists,
    #[strum(serialize = "drop", serialize = "delete")]
    Drop,
    #[strum(serialize = "list", serialize = "ls")]
    List,
    Comment,
    Help,
    #[strum(serialize = "exit", serialize = "quit")]
    Exit,
}

fn parse_columns(spec: &str) -> Result<Vec<Column>> {
    spec.split(',')
        .map(|part| {
            let (name, ty) = part
                .split_once(':')
                .ok_or_else(|| miette!("Expected <name>:<type>, got '{part}'"))?;
            Ok(Column::parse(name.trim(), ty)?)
        })
        .collect()
}

fn create(tables: &Tables, args: &[&str]) -> Result<String> {
    let [name, columns, rest @ ..] = args else {
        return Err(miette!("Usage: create <name> <col:type,...>"));
    };

    let mut schema = TableSchema::new();
    for column in parse_columns(columns)? {
        schema.add_column(column)?;
    }

    let mut rest = rest;
    if let ["partitioned", partitions, tail @ ..] = rest {
        for column in parse_columns(partitions)? {
            schema.add_partition_column(column)?;
        }
        rest = tail;
    }

    let mut options = CreateOptions::new();
    match rest {
        [] => {}
        ["comment", text @ ..] => options = options.comment(&text.join(" ")),
        _ => return Err(miette!("Unexpected arguments: {}", rest.join(" "))),
    }

    let table = tables.create_with(tables.project(), name, &schema, options)?;
    Ok(format!("Created {}.{}", table.project(), table.name()))
}

fn describe(tables: &Tables, name: &str) -> Result<String> {
    let mut table = tables.get(name);
    let meta = table.meta()?;

    let mut out = format!("{}.{} {}", meta.project, meta.name, meta.schema);
    if !meta.comment.is_empty() {
        out.push_str(&format!("\n  comment: {}", meta.comment));
    }
    out.push_str(&format!("\n  owner: {}", meta.owner));
    if let Some(days) = meta.lifecycle {
        out.push_str(&format!("\n  lifecycle: {days} days"));
    }
    Ok(out)
}

fn list(tables: &Tables, prefix: Option<&str>) -> Result<String> {
    let filter = match prefix {
        Some(prefix) => TableFilter::new().name(prefix),
        None => TableFilter::new(),
    };

    let mut names = Vec::new();
    for table in tables.iter_filtered(filter) {
        names.push(table?.name().to_string());
    }
    Ok(format!("{} table(s)\n{}", names.len(), names.join("\n")))
}

fn execute(tables: &Tables, input: &str) -> Result<Option<String>> {
    let words: Vec<&str> = input.split_whitespace().collect();
    let Some((head, args)) = words.split_first() else {
        return Ok(Some(String::new()));
    };

    let command =
        Command::from_str(head).map_err(|_| miette!("Unknown command '{head}', try 'help'"))?;

    let output = match (command, args) {
        (Command::Exit, _) => return Ok(None),
        (Command::Help, _) => HELP.to_string(),
        (Command::Create, args) => create(tables, args)?,
        (Command::Desc, [name]) => describe(tables, name)?,
        (Command::Exists, [name]) => tables.exists(name)?.to_string(),
        (Command::Drop, [name]) => {
            tables.delete(name)?;
            format!("Dropped {name}")
        }
        (Command::List, []) => list(tables, None)?,
        (Command::List, [prefix]) => list(tables, Some(*prefix))?,
        (Command::Comment, [name, text @ ..]) => {
            tables.set_comment(name, &text.join(" "))?;
            format!("Updated comment on {name}")
        }
        (command, _) => return Err(miette!("Wrong arguments for {command:?}, try 'help'")),
    };

    Ok(Some(output))
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(false)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::var(PROJECT_ENV) {
        Ok(_) => CatalogConfig::from_env()?,
        Err(_) => CatalogConfig::new(DEFAULT_PROJECT)?,
    };
    let catalog = Arc::new(MemoryCatalog::new().with_project(config.project()));
    let tables = Tables::new(config, catalog);

    println!("Catalog shell bound to project {}", tables.project());

    let mut buf = String::new();
    let mut stdin = stdin().lock();
    let mut stdout = stdout().lock();

    loop {
        stdout.write_all(b"tablecat> ").into_diagnostic()?;
        stdout.flush().into_diagnostic()?;

        buf.clear();
        let read = stdin.read_line(&mut buf).into_diagnostic()?;
        if read == 0 {
            break;
        }

        match execute(&tables, buf.trim()) {
            Ok(Some(output)) if output.is_empty() => {}
            Ok(Some(output)) => writeln!(stdout, "{output}").into_diagnostic()?,
            Ok(None) => break,
            Err(err) => writeln!(stdout, "{err:?}").into_diagnostic()?,
        }
    }

    println!("Exiting tablecat");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> Tables {
        let catalog = Arc::new(MemoryCatalog::new().with_project("prj"));
        Tables::new(CatalogConfig::new("prj").unwrap(), catalog)
    }

    #[test]
    fn test_command_aliases() {
        assert_eq!(Command::from_str("DESCRIBE").unwrap(), Command::Desc);
        assert_eq!(Command::from_str("ls").unwrap(), Command::List);
        assert_eq!(Command::from_str("quit").unwrap(), Command::Exit);
        assert!(Command::from_str("select").is_err());
    }

    #[test]
    fn test_create_describe_drop() {
        let tables = shell();
        let out = execute(
            &tables,
            "create t1 c1:bigint,c2:boolean partitioned p1:bigint comment daily load",
        )
        .unwrap()
        .unwrap();
        assert_eq!(out, "Created prj.t1");

        let out = execute(&tables, "desc t1").unwrap().unwrap();
        assert!(out.starts_with("prj.t1 (c1 BIGINT, c2 BOOLEAN) PARTITIONED BY (p1 BIGINT)"));
        assert!(out.contains("comment: daily load"));

        assert_eq!(execute(&tables, "exists t1").unwrap().unwrap(), "true");
        execute(&tables, "drop t1").unwrap();
        assert_eq!(execute(&tables, "exists t1").unwrap().unwrap(), "false");
        assert!(execute(&tables, "desc t1").is_err());
    }

    #[test]
    fn test_list_with_prefix() {
        let tables = shell();
        execute(&tables, "create users id:bigint").unwrap();
        execute(&tables, "create orders id:bigint").unwrap();

        let out = execute(&tables, "list us").unwrap().unwrap();
        assert_eq!(out, "1 table(s)\nusers");
    }

    #[test]
    fn test_bad_input() {
        let tables = shell();
        assert!(execute(&tables, "create t1 c1").is_err());
        assert!(execute(&tables, "create t1 c1:int128").is_err());
        assert!(execute(&tables, "create t1 p1:bigint partitioned p1:bigint").is_err());
        assert!(execute(&tables, "frobnicate").is_err());
        assert_eq!(execute(&tables, "exit").unwrap(), None);
        assert_eq!(execute(&tables, "").unwrap(), Some(String::new()));
    }
}
