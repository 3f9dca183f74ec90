// gdsh: Graph-Desk Shell (optional terminal client)
// Build with: cargo build --features cli --bin gdsh

use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use graph_desk::api::{Gateway, HttpGateway};
use graph_desk::display::{AggregateView, NodeListView, NodeRow};
use graph_desk::forms::nodes::{
    AggregateForm, CreateNodeMultiForm, CreateNodeSingleForm, CreateNodeWithPropsForm, DeleteNodesForm,
    FilterRow, RemoveNodePropsForm, SearchForm, UpdateNodesForm,
};
use graph_desk::forms::relationships::{
    CreateRelationshipForm, DeleteRelationshipsForm, EndpointFields, RelationshipRemovalRow,
    RelationshipUpdateRow, RemoveRelationshipPropsForm, UpdateRelationshipsForm,
};
use graph_desk::forms::{Feedback, SubmitForm, ValuePolicy};
use graph_desk::persistence::settings::AppSettings;
use graph_desk::store::{NodeSessionStore, RelationshipStore};

#[derive(Parser)]
#[command(name = "gdsh", version, about = "Graph-Desk Shell: administer a graph backend from the terminal")]
struct Cli {
    /// API base url (overrides settings and GRAPH_DESK_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
    /// Send property values as typed text without parsing numbers, booleans or lists
    #[arg(long)]
    raw_values: bool,
    /// Append every request to the daily request log
    #[arg(long)]
    log_requests: bool,
    /// Suppress banner/help text
    #[arg(short, long)]
    quiet: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

/// Commands accepted both on the command line and inside the shell.
#[derive(Subcommand, Clone, Debug)]
enum Command {
    /// Search nodes by labels and property filters
    Search {
        /// Comma separated labels
        #[arg(short, long, default_value = "")]
        labels: String,
        /// Filter such as "age>=30", "city IN Paris,Rome" or "name CONTAINS an" (repeatable)
        #[arg(short = 'w', long = "where", value_name = "EXPR")]
        filters: Vec<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Count/avg/max/min/sum of a numeric property
    Aggregate { label: String, property: String },
    /// Create a node with one label
    CreateNode { label: String },
    /// Create a node with two or more labels
    CreateNodeMulti {
        #[arg(num_args = 1..)]
        labels: Vec<String>,
    },
    /// Create a node with at least five properties
    CreateNodeProps {
        label: String,
        /// key=value (repeatable)
        #[arg(short, long = "prop", value_name = "KEY=VALUE")]
        props: Vec<String>,
    },
    /// Set properties on several nodes
    UpdateNodes {
        label: String,
        /// Comma separated node ids
        #[arg(long)]
        ids: String,
        #[arg(short, long = "prop", value_name = "KEY=VALUE")]
        props: Vec<String>,
    },
    /// Remove properties from several nodes
    RemoveNodeProps {
        label: String,
        #[arg(long)]
        ids: String,
        #[arg(num_args = 1..)]
        properties: Vec<String>,
    },
    /// Delete several nodes
    DeleteNodes {
        label: String,
        #[arg(long)]
        ids: String,
    },
    /// Create a relationship: PATTERN is Label1:id1-[TYPE]->Label2:id2
    CreateRel {
        pattern: String,
        #[arg(short, long = "prop", value_name = "KEY=VALUE")]
        props: Vec<String>,
    },
    /// Update relationships; each --rel is "PATTERN;key=value;..."
    UpdateRels {
        #[arg(long = "rel", required = true)]
        rels: Vec<String>,
    },
    /// Remove relationship properties; each --rel is "PATTERN;prop;..."
    RemoveRelProps {
        #[arg(long = "rel", required = true)]
        rels: Vec<String>,
    },
    /// Delete relationships given as patterns
    DeleteRels {
        #[arg(num_args = 1..)]
        patterns: Vec<String>,
    },
}

/// One shell line; the binary name is not part of the input.
#[derive(Parser)]
#[command(no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Tabled)]
struct NodeTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Labels")]
    labels: String,
    #[tabled(rename = "Properties")]
    properties: String,
}

impl From<NodeRow> for NodeTableRow {
    fn from(row: NodeRow) -> Self {
        let properties = row.properties_text();
        Self { id: row.id, labels: row.labels, properties }
    }
}

struct Shell {
    nodes: NodeSessionStore,
    rels: RelationshipStore,
    policy: ValuePolicy,
    default_limit: u32,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

fn parse_pairs(raw: &[String]) -> Result<Vec<(String, String)>, String> {
    raw.iter().map(|p| parse_pair(p)).collect()
}

/// Splits `PATTERN;item;item` into the endpoints and the trailing items.
fn parse_rel_spec(spec: &str) -> Result<(EndpointFields, Vec<String>), String> {
    let mut parts = spec.split(';');
    let pattern = parts.next().unwrap_or_default();
    let endpoints = EndpointFields::parse_pattern(pattern)?;
    let items = parts.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
    Ok((endpoints, items))
}

fn report(fb: &Feedback) -> bool {
    if let Some(msg) = &fb.message {
        println!("{}", msg);
    }
    if let Some(err) = &fb.error {
        eprintln!("error: {}", err);
    }
    fb.error.is_none()
}

fn submit<F: SubmitForm>(mut form: F, store: &F::Store) -> bool {
    form.submit(store);
    report(form.feedback())
}

impl Shell {
    fn run(&self, command: Command) -> bool {
        match self.dispatch(command) {
            Ok(ok) => ok,
            Err(msg) => {
                eprintln!("error: {}", msg);
                false
            }
        }
    }

    fn dispatch(&self, command: Command) -> Result<bool, String> {
        let ok = match command {
            Command::Search { labels, filters, limit } => {
                let mut form = SearchForm::new(self.default_limit);
                form.labels = labels;
                form.filters = filters.iter().map(|f| FilterRow::parse_expr(f)).collect::<Result<_, _>>()?;
                if let Some(n) = limit {
                    form.limit = n.to_string();
                }
                form.submit(&self.nodes);
                self.print_nodes()
            }
            Command::Aggregate { label, property } => {
                let mut form = AggregateForm { label, property, ..Default::default() };
                if !form.submit(&self.nodes) {
                    return Ok(report(&form.feedback));
                }
                self.print_aggregate()
            }
            Command::CreateNode { label } => {
                submit(CreateNodeSingleForm { label, ..Default::default() }, &self.nodes)
            }
            Command::CreateNodeMulti { labels } => {
                submit(CreateNodeMultiForm { labels: labels.join(","), ..Default::default() }, &self.nodes)
            }
            Command::CreateNodeProps { label, props } => {
                let mut form = CreateNodeWithPropsForm::new(self.policy);
                form.label = label;
                form.properties = parse_pairs(&props)?;
                submit(form, &self.nodes)
            }
            Command::UpdateNodes { label, ids, props } => {
                let mut form = UpdateNodesForm::new(self.policy);
                form.label = label;
                form.node_ids = ids;
                form.properties = parse_pairs(&props)?;
                submit(form, &self.nodes)
            }
            Command::RemoveNodeProps { label, ids, properties } => {
                submit(RemoveNodePropsForm { label, node_ids: ids, properties, ..Default::default() }, &self.nodes)
            }
            Command::DeleteNodes { label, ids } => {
                submit(DeleteNodesForm { label, node_ids: ids, ..Default::default() }, &self.nodes)
            }
            Command::CreateRel { pattern, props } => {
                let mut form = CreateRelationshipForm::new(self.policy);
                form.endpoints = EndpointFields::parse_pattern(&pattern)?;
                form.properties = parse_pairs(&props)?;
                submit(form, &self.rels)
            }
            Command::UpdateRels { rels } => {
                let mut form = UpdateRelationshipsForm::new(self.policy);
                form.rows = rels
                    .iter()
                    .map(|spec| {
                        let (endpoints, items) = parse_rel_spec(spec)?;
                        Ok(RelationshipUpdateRow { endpoints, properties: parse_pairs(&items)? })
                    })
                    .collect::<Result<_, String>>()?;
                submit(form, &self.rels)
            }
            Command::RemoveRelProps { rels } => {
                let rows = rels
                    .iter()
                    .map(|spec| {
                        let (endpoints, properties) = parse_rel_spec(spec)?;
                        Ok(RelationshipRemovalRow { endpoints, properties })
                    })
                    .collect::<Result<_, String>>()?;
                submit(RemoveRelationshipPropsForm { rows, ..Default::default() }, &self.rels)
            }
            Command::DeleteRels { patterns } => {
                let rows = patterns.iter().map(|p| EndpointFields::parse_pattern(p)).collect::<Result<_, _>>()?;
                submit(DeleteRelationshipsForm { rows, ..Default::default() }, &self.rels)
            }
        };
        Ok(ok)
    }

    fn print_nodes(&self) -> bool {
        match NodeListView::from_session(&self.nodes.snapshot()) {
            NodeListView::Table(rows) => {
                let count = rows.len();
                let rows: Vec<NodeTableRow> = rows.into_iter().map(NodeTableRow::from).collect();
                println!("{}", Table::new(&rows).with(Style::psql()));
                println!("{} node(s)", count);
                true
            }
            view @ NodeListView::Error(_) => {
                eprintln!("{}", view.status_text().unwrap_or_default());
                false
            }
            view => {
                println!("{}", view.status_text().unwrap_or_default());
                true
            }
        }
    }

    fn print_aggregate(&self) -> bool {
        match AggregateView::from_session(&self.nodes.snapshot()) {
            AggregateView::Results(lines) => {
                for line in lines {
                    println!("{}", line);
                }
                true
            }
            AggregateView::Error(msg) => {
                eprintln!("Error: {}", msg);
                false
            }
            AggregateView::Hidden | AggregateView::Loading => true,
        }
    }
}

fn repl(shell: &Shell, endpoint: &str, quiet: bool) {
    let mut rl: Editor<(), DefaultHistory> = match Editor::new() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("failed to initialize editor: {}", e);
            std::process::exit(1);
        }
    };
    let hist_path = AppSettings::settings_dir().join("gdsh_history.txt");
    let _ = std::fs::create_dir_all(AppSettings::settings_dir());
    let _ = rl.load_history(&hist_path);

    if !quiet {
        eprintln!(
            "Using {}.\nType a command (e.g. search -l Person -w \"age>=30\"). Commands: help, quit / exit. History saved at {}.\n",
            endpoint,
            hist_path.display()
        );
    }

    loop {
        match rl.readline("gdsh> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() { continue; }
                if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") { break; }
                rl.add_history_entry(input).ok();
                let input = if input == "?" || input.eq_ignore_ascii_case("help") { "--help" } else { input };

                let Some(args) = shlex::split(input) else {
                    eprintln!("error: invalid quoting");
                    continue;
                };
                match ShellLine::try_parse_from(args) {
                    Ok(parsed) => {
                        shell.run(parsed.command);
                    }
                    Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                        println!("{}", e);
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("readline error: {}", e);
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = AppSettings::load()
        .unwrap_or_else(|e| {
            log::warn!("could not read settings, using defaults: {:#}", e);
            AppSettings::default()
        })
        .with_env_overrides();
    if let Some(url) = cli.api_url {
        settings.api_base_url = url;
    }
    if cli.raw_values {
        settings.value_policy = ValuePolicy::Raw;
    }
    if cli.log_requests {
        settings.request_log_enabled = true;
    }

    let gateway = HttpGateway::from_settings(&settings)?;
    let endpoint = gateway.base_url().to_string();
    let gateway: Arc<dyn Gateway> = Arc::new(gateway);
    let shell = Shell {
        nodes: NodeSessionStore::new(gateway.clone()),
        rels: RelationshipStore::new(gateway),
        policy: settings.value_policy,
        default_limit: settings.search_limit(),
    };

    match cli.command {
        Some(command) => {
            if !shell.run(command) {
                std::process::exit(1);
            }
        }
        None => repl(&shell, &endpoint, cli.quiet),
    }
    Ok(())
}
