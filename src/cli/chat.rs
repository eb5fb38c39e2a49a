//! 대화형 채팅 루프
//!
//! 한 줄씩 질문을 읽고 답을 출력합니다. 종료 단어나 EOF에서 끝납니다.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::assistant::{Assistant, SAMPLE_QUESTIONS};

/// 종료 단어 (대소문자 무시)
pub const STOP_WORDS: &[&str] = &["stop", "exit", "quit", "стоп"];

pub const FAREWELL: &str = "Goodbye! Come back for more F1 facts.";
pub const EMPTY_INPUT_HINT: &str = "Please enter a question.";

/// 종료 단어인지
pub fn is_stop_word(input: &str) -> bool {
    let lower = input.trim().to_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

/// 채팅 실행
pub async fn run_chat<R, W>(assistant: &Assistant, input: R, output: &mut W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "F1 assistant ready. Ask about drivers and teams (type 'stop' to quit).")?;
    writeln!(output, "Example questions:")?;
    for question in SAMPLE_QUESTIONS.iter().take(3) {
        writeln!(output, "  - {}", question)?;
    }

    let mut lines = input.lines();
    loop {
        write!(output, "\n> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let question = line?;
        let question = question.trim();

        if is_stop_word(question) {
            writeln!(output, "{}", FAREWELL)?;
            break;
        }

        if question.is_empty() {
            writeln!(output, "{}", EMPTY_INPUT_HINT)?;
            continue;
        }

        let answer = assistant.answer(question).await;
        writeln!(output, "{}", answer)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedding;
    use crate::knowledge::{DriverRecord, KnowledgeBase};
    use std::io::Cursor;

    fn assistant() -> Assistant {
        let kb = KnowledgeBase::from_records(vec![DriverRecord {
            first_name: Some("Lando".to_string()),
            last_name: Some("Norris".to_string()),
            driver_number: Some(4),
            team_name: Some("McLaren".to_string()),
            country: None,
        }]);
        Assistant::new(kb, Box::new(HashEmbedding::default()))
    }

    #[test]
    fn test_stop_words() {
        for word in ["stop", "EXIT", " Quit ", "СТОП", "стоп"] {
            assert!(is_stop_word(word), "{word} should stop");
        }
        assert!(!is_stop_word("stop the car"));
        assert!(!is_stop_word(""));
    }

    #[tokio::test]
    async fn test_chat_session() {
        let input = Cursor::new("Lando Norris number?\n\nСТОП\nnever asked\n");
        let mut output = Vec::new();
        run_chat(&assistant(), input, &mut output)
            .await
            .expect("chat runs");

        let text = String::from_utf8(output).expect("utf8");
        assert!(text.contains("Lando Norris uses number 4"));
        assert!(text.contains(EMPTY_INPUT_HINT));
        assert!(text.contains(FAREWELL));
        assert!(!text.contains("never asked"));
    }

    #[tokio::test]
    async fn test_chat_ends_on_eof() {
        let input = Cursor::new("McLaren team Lando Norris\n");
        let mut output = Vec::new();
        run_chat(&assistant(), input, &mut output)
            .await
            .expect("chat runs");

        let text = String::from_utf8(output).expect("utf8");
        assert!(text.contains("Lando Norris plays for McLaren"));
        assert!(!text.contains(FAREWELL));
    }
}
