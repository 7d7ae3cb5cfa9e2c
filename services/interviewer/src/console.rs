//! Line-oriented terminal front end for an interview session.

use crate::report::{render_feedback, render_log, render_question};
use anyhow::Result;
use interview_core::{InterviewError, InterviewSession, Interviewer, SessionStatus};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const HELP: &str = "Type your answer and press Enter. Commands: /skip, /log, /restart, /help, /quit\n";

/// What a line of terminal input asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Answer(String),
    Skip,
    Restart,
    Log,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_line(line: &str) -> Action {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Action::Answer(line.to_string());
    };
    match command.to_lowercase().as_str() {
        "skip" | "s" => Action::Skip,
        "restart" | "reset" => Action::Restart,
        "log" | "history" => Action::Log,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        _ => Action::Unknown(trimmed.to_string()),
    }
}

async fn write<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

async fn show_question<W: AsyncWrite + Unpin>(session: &InterviewSession, out: &mut W) -> Result<()> {
    if let Some(question) = session.current_question() {
        let text = render_question(
            session.question_number(),
            session.config().max_questions,
            question,
        );
        write(out, &text).await?;
    }
    Ok(())
}

async fn show_error<W: AsyncWrite + Unpin>(out: &mut W, err: &InterviewError) -> Result<()> {
    tracing::error!("Transition failed: {}", err);
    write(
        out,
        &format!("\n!! {err}\n!! Your progress is intact; please try again.\n"),
    )
    .await
}

/// Drives `session` from terminal input until the user quits or input ends.
pub async fn run<R, W, I>(
    session: &mut InterviewSession,
    interviewer: &I,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    I: Interviewer + ?Sized,
{
    let mut lines = input.lines();

    loop {
        match session.status() {
            SessionStatus::NotStarted => {
                let config = session.config();
                write(
                    out,
                    &format!(
                        "Starting a {} interview for {} ({} questions).\n{HELP}",
                        config.interview_type, config.role, config.max_questions
                    ),
                )
                .await?;

                if let Err(e) = session.start(interviewer).await {
                    show_error(out, &e).await?;
                    write(out, "Press Enter to retry or type /quit.\n").await?;
                    match lines.next_line().await? {
                        Some(line) if parse_line(&line) != Action::Quit => continue,
                        _ => return Ok(()),
                    }
                }
                show_question(session, out).await?;
            }
            SessionStatus::InProgress => {
                let Some(line) = lines.next_line().await? else {
                    return Ok(());
                };
                let result = match parse_line(&line) {
                    Action::Answer(answer) => session.submit(interviewer, &answer).await,
                    Action::Skip => session.skip(interviewer).await,
                    Action::Restart => {
                        session.restart();
                        write(out, "Interview reset.\n").await?;
                        continue;
                    }
                    Action::Log => {
                        write(out, &render_log(session.history())).await?;
                        write(out, "> ").await?;
                        continue;
                    }
                    Action::Help => {
                        write(out, HELP).await?;
                        write(out, "> ").await?;
                        continue;
                    }
                    Action::Quit => return Ok(()),
                    Action::Unknown(command) => {
                        write(out, &format!("Unknown command {command}. {HELP}> ")).await?;
                        continue;
                    }
                };

                match result {
                    Ok(()) => show_question(session, out).await?,
                    Err(InterviewError::EmptyAnswer) => {
                        write(out, "Please enter or speak an answer before submitting.\n> ").await?;
                    }
                    Err(e) => {
                        show_error(out, &e).await?;
                        show_question(session, out).await?;
                    }
                }
            }
            SessionStatus::Finished => {
                if session.feedback().is_none() {
                    write(out, "\nInterview complete. Analyzing your responses...\n").await?;
                    if let Err(e) = session.generate_feedback(interviewer).await {
                        show_error(out, &e).await?;
                        write(out, "Press Enter to retry or type /quit.\n").await?;
                        match lines.next_line().await? {
                            Some(line) if parse_line(&line) != Action::Quit => continue,
                            _ => return Ok(()),
                        }
                    }
                    if let Some(feedback) = session.feedback() {
                        let report =
                            render_feedback(feedback, session.config(), session.history().len());
                        write(out, &format!("\n{report}")).await?;
                    }
                }

                write(out, "\nType /restart to practice again, /log to review answers, or /quit.\n").await?;
                let Some(line) = lines.next_line().await? else {
                    return Ok(());
                };
                match parse_line(&line) {
                    Action::Restart => session.restart(),
                    Action::Log => write(out, &render_log(session.history())).await?,
                    Action::Quit => return Ok(()),
                    _ => {}
                }
            }
        }
    }
}
