use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
};

use crate::domain::analysis::{AnalysisReport, Verdict};
use crate::domain::dashboard::DashboardSummary;
use crate::inbox::AnalysisEntry;
use crate::terminal::state::{AppState, DetailTab, Route};

fn verdict_color(verdict: &Verdict) -> Color {
    match verdict {
        Verdict::Legitimate => Color::Green,
        Verdict::Suspicious => Color::Yellow,
        Verdict::Phishing => Color::Red,
        Verdict::Other(_) => Color::DarkGray,
    }
}

pub fn render(f: &mut Frame, state: &AppState) {
    let [main, footer] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(f.area());

    match state.route {
        Route::Inbox => render_inbox(f, main, state),
        Route::Dashboard => render_dashboard(f, main, state),
    }

    render_footer(f, footer, state);
}

// ----- Inbox -----

fn render_inbox(f: &mut Frame, area: Rect, state: &AppState) {
    if state.detail_open() {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(area);
        render_email_list(f, left, state);
        render_detail(f, right, state);
    } else {
        render_email_list(f, area, state);
    }
}

fn render_email_list(f: &mut Frame, area: Rect, state: &AppState) {
    let border = if state.detail_open() {
        Color::DarkGray
    } else {
        Color::Yellow
    };
    let block = Block::default()
        .title(" Boîte de réception ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    if state.items.is_empty() {
        let p = Paragraph::new("Aucun email à afficher.")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(p, area);
        return;
    }

    let items: Vec<ListItem> = state.items.iter().map(|e| {
        let head = Line::from(vec![
            Span::styled(
                e.sender_name().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(e.timestamp.clone(), Style::default().fg(Color::DarkGray)),
        ]);
        let subject = Line::from(e.subject.clone());

        let status = if e.is_analyzing {
            Line::from(Span::styled(
                "⟳ Analyse en cours…",
                Style::default().fg(Color::Yellow),
            ))
        } else if let Some(entry) = state.entries.get(&e.id) {
            let color = match entry {
                AnalysisEntry::Report(r) => verdict_color(&r.verdict()),
                AnalysisEntry::Failed(_) => Color::Red,
            };
            Line::from(Span::styled(
                format!("{} {}", entry.confidence_label(), entry.verdict_label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(Span::styled("—", Style::default().fg(Color::DarkGray)))
        };

        ListItem::new(Text::from(vec![head, subject, status]))
    })
    .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("➜ ")
        .highlight_style(Style::default().fg(Color::Green));

    f.render_stateful_widget(list, area, &mut state.list_state.clone());
}

fn render_detail(f: &mut Frame, area: Rect, state: &AppState) {
    let title = match state.opened_email() {
        Some(e) => format!(" Analyse — {} ", e.sender_name()),
        None => " Analyse ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(entry) = &state.opened_entry else {
        return;
    };

    let [header, tabs_area, content] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(inner);

    match entry {
        AnalysisEntry::Failed(msg) => {
            let p = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Erreur d'analyse",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(msg.clone()),
            ])
            .wrap(Wrap { trim: false });
            f.render_widget(p, inner);
        }
        AnalysisEntry::Report(report) => {
            let verdict_style = Style::default()
                .fg(verdict_color(&report.verdict()))
                .add_modifier(Modifier::BOLD);
            let mut head_lines = vec![Line::from(vec![
                Span::raw("Verdict : "),
                Span::styled(report.phishgard_verdict.clone(), verdict_style),
                Span::raw(format!(" ({})", report.confidence_score)),
            ])];
            if !report.summary.is_empty() {
                head_lines.push(Line::from(Span::styled(
                    report.summary.clone(),
                    Style::default().fg(Color::Gray),
                )));
            }
            f.render_widget(Paragraph::new(head_lines), header);

            let tabs = Tabs::new(DetailTab::TITLES.to_vec())
                .select(state.detail_tab.index())
                .highlight_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                );
            f.render_widget(tabs, tabs_area);

            let text = match state.detail_tab {
                DetailTab::Heuristic => heuristic_text(report),
                DetailTab::UrlMl => url_ml_text(report),
                DetailTab::Llm => llm_text(report),
                DetailTab::Osint => osint_text(report),
            };
            f.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), content);
        }
    }
}

fn unavailable() -> Text<'static> {
    Text::from(Span::styled(
        "Non disponible pour cet email.",
        Style::default().fg(Color::DarkGray),
    ))
}

fn heuristic_text(report: &AnalysisReport) -> Text<'static> {
    let Some(h) = &report.breakdown.heuristic_analysis else {
        return unavailable();
    };
    let mut lines = vec![
        Line::from(format!("Score heuristique : {}/100", h.summary.score)),
        Line::default(),
        Line::from(Span::styled(
            "Indicateurs positifs :",
            Style::default().fg(Color::Green),
        )),
    ];
    if h.summary.positive_indicators.is_empty() {
        lines.push(Line::from("  (aucun)"));
    }
    for ind in &h.summary.positive_indicators {
        lines.push(Line::from(format!("  • {ind}")));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Indicateurs négatifs :",
        Style::default().fg(Color::Red),
    )));
    if h.summary.negative_indicators.is_empty() {
        lines.push(Line::from("  (aucun)"));
    }
    for ind in &h.summary.negative_indicators {
        lines.push(Line::from(format!("  • {ind}")));
    }
    Text::from(lines)
}

fn url_ml_text(report: &AnalysisReport) -> Text<'static> {
    let Some(u) = &report.breakdown.url_ml_analysis else {
        return unavailable();
    };
    Text::from(vec![
        Line::from(format!("Prédiction du modèle : {}", u.prediction)),
        Line::from(format!("P(légitime) : {}", u.probability_legitimate)),
        Line::from(format!("P(phishing) : {}", u.probability_phishing)),
    ])
}

fn llm_text(report: &AnalysisReport) -> Text<'static> {
    let Some(l) = &report.breakdown.llm_analysis else {
        return unavailable();
    };
    Text::from(vec![
        Line::from(format!("Classification : {}", l.classification)),
        Line::from(format!("Confiance : {}/10", l.confidence_score)),
        Line::default(),
        Line::from(format!("Raison : {}", l.reason)),
    ])
}

fn osint_text(report: &AnalysisReport) -> Text<'static> {
    let Some(o) = &report.breakdown.osint_enrichment else {
        return unavailable();
    };
    let mut lines = Vec::new();
    for ip in &o.ip_analysis {
        let org = ip.ipinfo["org"].as_str().unwrap_or("organisation inconnue");
        let abuse = ip.abuseipdb["abuseConfidenceScore"].as_i64().unwrap_or(0);
        lines.push(Line::from(format!("IP : {} ({org})", ip.ip)));
        lines.push(Line::from(format!("  Score de réputation : {abuse}%")));
    }
    if let Some(domains) = o.domain_analysis.as_object() {
        for (domain, data) in domains {
            match data["age_days"].as_i64() {
                Some(age) => {
                    lines.push(Line::from(format!("Domaine : {domain} — {age} jour(s)")))
                }
                None => lines.push(Line::from(format!("Domaine : {domain}"))),
            }
        }
    }
    if lines.is_empty() {
        return unavailable();
    }
    Text::from(lines)
}

// ----- Dashboard -----

fn render_dashboard(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Tableau de bord ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(data) = &state.dashboard else {
        let p = Paragraph::new("Chargement du tableau de bord…")
            .style(Style::default().fg(Color::Gray));
        f.render_widget(p, inner);
        return;
    };

    let [kpis, middle, threats] = Layout::vertical([
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Min(0),
    ])
    .areas(inner);

    render_kpis(f, kpis, data, state.dashboard_period_days);

    let [volume, distribution] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .areas(middle);
    render_daily_volume(f, volume, data);
    render_distribution(f, distribution, data);

    render_latest_threats(f, threats, data);
}

fn trend_span(label: String) -> Span<'static> {
    let color = if label.starts_with('▲') {
        Color::Green
    } else if label.starts_with('▼') {
        Color::Red
    } else {
        Color::DarkGray
    };
    Span::styled(label, Style::default().fg(color))
}

fn render_kpis(f: &mut Frame, area: Rect, data: &DashboardSummary, period_days: u32) {
    let k = &data.kpis;
    let lines = vec![
        Line::from(Span::styled(
            format!("Période : {} jour(s)", period_days),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![
            Span::styled(
                format!("{:>8.0}", k.emails_analyzed.value),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  Emails analysés   "),
            trend_span(k.emails_analyzed.trend_label()),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{:>8.0}", k.phishing_detected.value),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  Phishing détecté  "),
            trend_span(k.phishing_detected.trend_label()),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{:>8.0}", k.suspicious_detected.value),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  Emails suspects   "),
            trend_span(k.suspicious_detected.trend_label()),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{:>7.1}%", k.threat_rate.value),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  Taux de menace    "),
            trend_span(k.threat_rate.trend_label()),
        ]),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_daily_volume(f: &mut Frame, area: Rect, data: &DashboardSummary) {
    let chart = &data.charts.daily_volume;
    let block = Block::default()
        .title(" Volume journalier ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let mut lines = Vec::with_capacity(chart.labels.len());
    for (i, label) in chart.labels.iter().enumerate() {
        let mut spans = vec![Span::styled(
            format!("{label:<12}"),
            Style::default().fg(Color::Gray),
        )];
        for dataset in &chart.datasets {
            let value = dataset.data.get(i).copied().unwrap_or(0.0);
            let color = verdict_color(&Verdict::parse(&dataset.name));
            spans.push(Span::styled(
                format!("{:>6.0} ", value),
                Style::default().fg(color),
            ));
        }
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_distribution(f: &mut Frame, area: Rect, data: &DashboardSummary) {
    let chart = &data.charts.status_distribution;
    let block = Block::default()
        .title(" Répartition des statuts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let total: i64 = chart.data.iter().sum();
    let mut lines = Vec::with_capacity(chart.labels.len());
    for (label, value) in chart.labels.iter().zip(&chart.data) {
        let pct = if total > 0 {
            *value as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        let color = verdict_color(&Verdict::parse(label));
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<12}"), Style::default().fg(color)),
            Span::raw(format!("{value:>6}  ({pct:.1}%)")),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_latest_threats(f: &mut Frame, area: Rect, data: &DashboardSummary) {
    let block = Block::default()
        .title(" Dernières menaces ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let threats = &data.activity_feeds.latest_threats;
    if threats.is_empty() {
        let p = Paragraph::new("Aucune menace détectée sur cette période.")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(p, area);
        return;
    }

    let items: Vec<ListItem> = threats
        .iter()
        .map(|t| {
            let color = verdict_color(&Verdict::parse(&t.status));
            let head = Line::from(vec![
                Span::styled(
                    format!("[{}] ", t.status),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(t.subject.clone()),
            ]);
            let meta = Line::from(Span::styled(
                format!(
                    "  {} — {} (score {})",
                    t.sender_address, t.received_at, t.risk_score
                ),
                Style::default().fg(Color::DarkGray),
            ));
            ListItem::new(Text::from(vec![head, meta]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

// ----- Footer -----

fn render_footer(f: &mut Frame, area: Rect, state: &AppState) {
    if let Some(msg) = &state.status_line {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                msg.clone(),
                Style::default().fg(Color::Yellow),
            ))),
            area,
        );
        return;
    }

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let hint = match state.route {
        Route::Inbox => Line::from(vec![
            Span::styled("j/k", bold),
            Span::raw(" naviguer  "),
            Span::styled("Entrée", bold),
            Span::raw(" analyser  "),
            Span::styled("Tab", bold),
            Span::raw(" onglets  "),
            Span::styled("r", bold),
            Span::raw(" actualiser  "),
            Span::styled("2", bold),
            Span::raw(" tableau de bord  "),
            Span::styled("q", bold),
            Span::raw(" quitter"),
        ]),
        Route::Dashboard => Line::from(vec![
            Span::styled("w", bold),
            Span::raw(" 7j  "),
            Span::styled("m", bold),
            Span::raw(" 30j  "),
            Span::styled("d", bold),
            Span::raw(" aujourd'hui  "),
            Span::styled("r", bold),
            Span::raw(" actualiser  "),
            Span::styled("1", bold),
            Span::raw(" boîte de réception  "),
            Span::styled("q", bold),
            Span::raw(" quitter"),
        ]),
    };
    f.render_widget(Paragraph::new(hint), area);
}
