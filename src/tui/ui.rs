use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::Module;
use crate::app::{App, InputMode};
use crate::models::{ArticleStatus, ImageStatus, PublicationStatus, RewriteStyle, Theme};

const PREVIEW_WIDTH: usize = 72;

pub fn draw(frame: &mut Frame, app: &App) {
    // Sidebar with the module list, main area on the right
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(0)])
        .split(frame.area());

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Module view
            Constraint::Length(1), // Status line
        ])
        .split(main_chunks[1]);

    render_sidebar(frame, app, main_chunks[0]);
    render_header(frame, app, right_chunks[0]);

    match app.module() {
        Module::Dashboard => render_dashboard(frame, app, right_chunks[1]),
        Module::Collection => render_collection(frame, app, right_chunks[1]),
        Module::Materials => render_materials(frame, app, right_chunks[1]),
        Module::Rewrite => render_rewrite(frame, app, right_chunks[1]),
        Module::Illustration => render_illustration(frame, app, right_chunks[1]),
        Module::Publish => render_publish(frame, app, right_chunks[1]),
        Module::Settings => render_settings(frame, app, right_chunks[1]),
    }

    render_status(frame, app, right_chunks[2]);

    if let Some(mode) = app.input_mode {
        render_input(frame, app, mode);
    }

    if app.show_help {
        render_help(frame);
    }
}

fn accent(app: &App) -> Color {
    match app.state.config.theme {
        Theme::Light => Color::Cyan,
        Theme::Dark => Color::Magenta,
    }
}

fn status_color(status: ArticleStatus) -> Color {
    match status {
        ArticleStatus::Pending => Color::Yellow,
        ArticleStatus::Rewritten => Color::Blue,
        ArticleStatus::Published => Color::Green,
    }
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.module();
    let items: Vec<ListItem> = Module::ALL
        .iter()
        .enumerate()
        .map(|(i, module)| ListItem::new(format!("{} {}", i + 1, module.title())))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Content Ops ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent(app))),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Module::ALL.iter().position(|m| *m == current));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.state.dashboard_stats();
    let loading = if app.state.is_loading {
        format!(" {} working...", app.spinner())
    } else {
        String::new()
    };

    let block = Block::default()
        .title(format!(" {} ", app.module().title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent(app)));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = format!(
        " {} Articles | {} Pending | {} Rewritten | {} Published{}",
        stats.total_articles,
        stats.pending_articles,
        stats.rewritten_articles,
        stats.published_articles,
        loading
    );
    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.state.dashboard_stats();
    let publish = app.state.publish_stats();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);

    let lines = vec![
        Line::from(format!(" Total articles       {}", stats.total_articles)),
        Line::from(format!(" Rewrites             {}", stats.total_rewrites)),
        Line::from(format!(" Illustrations        {}", stats.total_illustrations)),
        Line::from(format!(
            " Publications         {} ({} ok, {} failed, {} pending)",
            publish.total, publish.successful, publish.failed, publish.pending
        )),
        Line::from(format!(
            " Connected accounts   {}/{}",
            app.state.connected_accounts().len(),
            app.state.accounts.len()
        )),
    ];
    let overview = Paragraph::new(lines).block(
        Block::default()
            .title(" Overview ")
            .borders(Borders::ALL),
    );
    frame.render_widget(overview, chunks[0]);

    let recent: Vec<ListItem> = app
        .state
        .articles
        .iter()
        .take(10)
        .map(|article| article_item(article.status, &article.source, &article.title))
        .collect();
    let list = List::new(recent).block(
        Block::default()
            .title(" Recent Articles ")
            .borders(Borders::ALL),
    );
    frame.render_widget(list, chunks[1]);
}

fn article_item<'a>(status: ArticleStatus, source: &'a str, title: &'a str) -> ListItem<'a> {
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{:<10}", status.label()),
            Style::default().fg(status_color(status)),
        ),
        Span::styled(format!("[{source}] "), Style::default().fg(Color::Blue)),
        Span::raw(title),
    ]))
}

fn render_article_list(frame: &mut Frame, app: &App, area: Rect, title: String) {
    let items: Vec<ListItem> = app
        .module_articles()
        .into_iter()
        .map(|article| article_item(article.status, &article.source, &article.title))
        .collect();

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn split_panes(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 5), Constraint::Ratio(3, 5)])
        .split(area);
    (chunks[0], chunks[1])
}

fn preview(text: &str) -> String {
    textwrap::fill(text, PREVIEW_WIDTH)
}

fn render_collection(frame: &mut Frame, app: &App, area: Rect) {
    let keyword = if app.keyword.is_empty() {
        "(default)"
    } else {
        app.keyword.as_str()
    };
    let title = format!(" {} | keyword: {} ", app.platform.label(), keyword);
    render_article_list(frame, app, area, title);
}

fn render_materials(frame: &mut Frame, app: &App, area: Rect) {
    let (left, right) = split_panes(area);
    let title = format!(
        " Materials [{}] [{}] [{}] ",
        app.filter.label(),
        app.filter.source.as_deref().unwrap_or("All sources"),
        app.filter.category.as_deref().unwrap_or("All categories")
    );
    render_article_list(frame, app, left, title);

    let content = match app.selected_article() {
        Some(article) => format!(
            "{}\n\n{} | {} | {}\nTags: {}\nReads {} | Likes {}\n\n{}",
            article.title,
            article.author,
            article.category,
            article.publish_time.format("%Y-%m-%d %H:%M"),
            article.tags.join(", "),
            article.read_count,
            article.like_count,
            preview(&article.content)
        ),
        None => "No articles match the current filter".to_string(),
    };

    let paragraph = Paragraph::new(content)
        .block(Block::default().title(" Article ").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, right);
}

fn render_rewrite(frame: &mut Frame, app: &App, area: Rect) {
    let (left, right) = split_panes(area);
    let title = format!(" Rewrite | style: {} ", app.style.name());
    render_article_list(frame, app, left, title);

    let mut lines: Vec<String> = Vec::new();
    if app.style == RewriteStyle::Custom {
        lines.push(format!("Custom prompt: {}", app.custom_prompt));
        lines.push(String::new());
    }

    match (&app.latest_rewrite, app.selected_article()) {
        (Some(record), Some(article)) if record.article_id == article.id => {
            lines.push(format!("{} -> {}", record.original_title, record.rewritten_title));
            lines.push(String::new());
            lines.push(preview(&record.rewritten_content));
            lines.push(String::new());
            lines.push("Press 'a' to apply this rewrite".to_string());
        }
        (_, Some(article)) => {
            let history = app.state.rewrites_for(&article.id);
            lines.push(format!("{} previous rewrites", history.len()));
            for record in history.iter().take(5) {
                lines.push(format!(
                    "  {} {}",
                    record.created_at.format("%m-%d %H:%M"),
                    record.rewritten_title
                ));
            }
            lines.push(String::new());
            lines.push("Press Enter to rewrite".to_string());
        }
        (_, None) => lines.push("No article to rewrite".to_string()),
    }

    let paragraph = Paragraph::new(lines.join("\n"))
        .block(Block::default().title(" Result ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, right);
}

fn render_illustration(frame: &mut Frame, app: &App, area: Rect) {
    let (left, right) = split_panes(area);
    let target = match app.paragraph {
        Some(i) => format!("paragraph {}", i + 1),
        None => "whole article".to_string(),
    };
    render_article_list(frame, app, left, format!(" Illustrate | {} ", target));

    let Some(article) = app.selected_article() else {
        let empty = Paragraph::new("No article selected")
            .block(Block::default().title(" Images ").borders(Borders::ALL));
        frame.render_widget(empty, right);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Min(0)])
        .split(right);

    let text = match app.paragraph.and_then(|i| article.paragraphs().get(i).copied()) {
        Some(paragraph) => preview(paragraph),
        None => preview(&article.content),
    };
    let source = Paragraph::new(text)
        .block(Block::default().title(" Source Text ").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(source, chunks[0]);

    let items: Vec<ListItem> = app
        .state
        .images_for(&article.id)
        .into_iter()
        .map(|image| {
            let color = match image.status {
                ImageStatus::Generating => Color::Yellow,
                ImageStatus::Completed => Color::Green,
                ImageStatus::Failed => Color::Red,
            };
            let target = image
                .associated_paragraph
                .map(|i| format!("p{} ", i + 1))
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<11}", image.status.label()), Style::default().fg(color)),
                Span::raw(target),
                Span::styled(image.url.clone(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    let images = List::new(items).block(Block::default().title(" Images ").borders(Borders::ALL));
    frame.render_widget(images, chunks[1]);
}

fn render_publish(frame: &mut Frame, app: &App, area: Rect) {
    let (left, right) = split_panes(area);
    let account = app
        .publish_account()
        .map(|a| a.name.as_str())
        .unwrap_or("no connected account");
    render_article_list(frame, app, left, format!(" Publish to {} ", account));

    let items: Vec<ListItem> = app
        .state
        .publications
        .iter()
        .rev()
        .map(|record| {
            let color = match record.status {
                PublicationStatus::Pending => Color::Yellow,
                PublicationStatus::Success => Color::Green,
                PublicationStatus::Failed => Color::Red,
            };
            let counts = match (record.view_count, record.like_count) {
                (Some(views), Some(likes)) => format!(" {} views, {} likes", views, likes),
                _ => String::new(),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<11}", record.status.label()), Style::default().fg(color)),
                Span::raw(record.title.clone()),
                Span::styled(counts, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let history = List::new(items).block(
        Block::default()
            .title(" Publication History ")
            .borders(Borders::ALL),
    );
    frame.render_widget(history, right);
}

fn render_settings(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    let config = &app.state.config;
    let key_status = if config.ai_api_key.is_empty() {
        "not set"
    } else {
        "set"
    };
    let lines = vec![
        Line::from(format!(" AI model          {}", config.ai_model)),
        Line::from(format!(" API key           {}", key_status)),
        Line::from(format!(" Collect interval  {} min", config.collect_interval)),
        Line::from(format!(" Auto rewrite      {}", if config.auto_rewrite { "on" } else { "off" })),
        Line::from(format!(" Theme             {:?}", config.theme)),
    ];
    let settings = Paragraph::new(lines).block(
        Block::default()
            .title(" Settings ")
            .borders(Borders::ALL),
    );
    frame.render_widget(settings, chunks[0]);

    let items: Vec<ListItem> = app
        .state
        .accounts
        .iter()
        .map(|account| {
            let (label, color) = if account.is_connected {
                ("connected", Color::Green)
            } else {
                ("offline", Color::Red)
            };
            let synced = account
                .last_sync_at
                .map(|t| format!(" synced {}", t.format("%Y-%m-%d %H:%M")))
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<10}", label), Style::default().fg(color)),
                Span::raw(format!("{} ({})", account.name, account.app_id)),
                Span::styled(synced, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title(" Accounts ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let hint = match app.module() {
        Module::Dashboard => "1-7:module  Tab:next  ?:help  q:quit",
        Module::Collection => "Enter:collect  p:platform  /:keyword  i:import",
        Module::Materials => "f:status  s:source  c:category  m:advance  d:delete  D:delete shown",
        Module::Rewrite => "Enter:rewrite  s:style  e:prompt  a:apply",
        Module::Illustration => "Enter:generate  p:paragraph  G:all  r:regenerate  d:delete",
        Module::Publish => "Enter:publish  n:next account",
        Module::Settings => "t:theme  w:auto rewrite  a:add  Enter:test  x:remove",
    };
    let text = app.status_message.as_deref().unwrap_or(hint);

    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, app: &App, mode: InputMode) {
    let area = centered_rect(60, 20, frame.area());

    let title = match mode {
        InputMode::Keyword => " Search keyword ",
        InputMode::Prompt => " Custom prompt ",
        InputMode::Account => " New account: name, app id ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let input_text = format!("> {}_", app.input);
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 70, frame.area());

    let help_text = vec![
        "",
        " Navigation:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   1-7      Jump to module",
        "   Tab      Next module",
        "",
        " Collect:   Enter collect, p platform, / keyword, i import",
        " Materials: f status, s source, c category filter,",
        "            m advance status, d delete, D delete all shown",
        " Rewrite:   Enter rewrite, s style, e prompt, a apply",
        " Illustrate: Enter generate, p paragraph, G all paragraphs,",
        "            r regenerate, d delete image",
        " Publish:   Enter publish, n next account",
        " Settings:  t theme, w auto rewrite, a add account,",
        "            Enter test connection, x remove account",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
