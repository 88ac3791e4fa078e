//! Statement logging hooks.

use std::fmt;
use std::sync::Arc;

use chrono::Local;
use colored::Colorize;

use crate::compile::ParameterBinding;
use crate::dialect::Dialect;

/// One compiled statement, handed to the logging sink before execution.
#[derive(Debug)]
pub struct SqlLogEvent<'a> {
    pub sql: &'a str,
    pub params: &'a [ParameterBinding],
    pub dialect: Dialect,
}

type LogSink = Arc<dyn Fn(&SqlLogEvent<'_>) + Send + Sync>;

/// Logging configuration shared by a session and its queries.
#[derive(Clone, Default)]
pub struct LogConfig {
    /// Print each compiled statement to stdout.
    pub print_sql: bool,
    /// Callback invoked with each compiled statement.
    pub on_execute: Option<LogSink>,
}

impl fmt::Debug for LogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogConfig")
            .field("print_sql", &self.print_sql)
            .field("on_execute", &self.on_execute.is_some().then_some("<sink>"))
            .finish()
    }
}

impl LogConfig {
    pub fn printing() -> Self {
        Self {
            print_sql: true,
            on_execute: None,
        }
    }

    pub fn with_sink(mut self, sink: impl Fn(&SqlLogEvent<'_>) + Send + Sync + 'static) -> Self {
        self.on_execute = Some(Arc::new(sink));
        self
    }

    /// Emit a compiled statement to the configured outputs.
    pub fn emit(&self, sql: &str, params: &[ParameterBinding], dialect: Dialect) {
        if !self.print_sql && self.on_execute.is_none() {
            return;
        }
        let event = SqlLogEvent {
            sql,
            params,
            dialect,
        };
        if self.print_sql {
            print_event(&event);
        }
        if let Some(sink) = &self.on_execute {
            sink(&event);
        }
    }
}

fn print_event(event: &SqlLogEvent<'_>) {
    let stamp = Local::now().format("%H:%M:%S%.3f");
    println!("{}", format!("[{}] SQL:", stamp).green());
    println!("{}", event.sql);
    if !event.params.is_empty() {
        println!("{}", "Parameters:".cyan());
        for param in event.params {
            println!("  {} = {}", param.placeholder, param.value);
        }
    }
}
