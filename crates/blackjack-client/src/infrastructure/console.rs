//! Terminal interaction: the round-count prompt and the interactive player.
//!
//! Both are generic over the reader and writer so tests can script the
//! "keyboard" with a byte slice and capture the output in a `Vec<u8>`.
//!
//! Stdin must be wrapped in exactly one `BufReader` for the life of the
//! process: [`stdin_reader`] creates it, [`prompt_rounds`] borrows it, and the
//! [`ConsoleDecider`] then takes it over.  A second buffer would lose whatever
//! the first one had already pulled in.

use async_trait::async_trait;
use blackjack_core::{clamp_rounds, Decision, Hand};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin};
use tracing::warn;

use crate::application::play_session::DecisionMaker;

/// Asks how many rounds to play.
///
/// Empty or unparsable input means one round; anything else is clamped to
/// `1..=255`.
///
/// # Errors
///
/// Propagates I/O errors from the terminal.
pub async fn prompt_rounds<R, W>(input: &mut R, output: &mut W) -> io::Result<u8>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(b"Enter number of rounds (default 1): ")
        .await?;
    output.flush().await?;

    let mut line = String::new();
    input.read_line(&mut line).await?;
    Ok(parse_rounds(&line))
}

/// The single buffered reader over stdin shared by every prompt.
pub fn stdin_reader() -> BufReader<Stdin> {
    BufReader::new(io::stdin())
}

fn parse_rounds(line: &str) -> u8 {
    line.trim().parse::<i64>().map(clamp_rounds).unwrap_or(1)
}

/// Interactive player reading `h`/`s` answers from a terminal.
pub struct ConsoleDecider<R, W> {
    input: R,
    output: W,
}

impl<R, W> ConsoleDecider<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    async fn ask(&mut self, player: &Hand, dealer: &Hand) -> io::Result<Decision> {
        let prompt = format!("Your hand: {player}\nDealer shows: {dealer}\nHit or Stand? [h/s] ");
        self.output.write_all(prompt.as_bytes()).await?;
        self.output.flush().await?;

        let mut line = String::new();
        self.input.read_line(&mut line).await?;
        Ok(Decision::from_wire_text(line.trim().as_bytes()))
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

#[async_trait]
impl<R, W> DecisionMaker for ConsoleDecider<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Anything but an `h`-prefixed answer stands, including end of input.
    async fn decide(&mut self, player: &Hand, dealer: &Hand) -> Decision {
        match self.ask(player, dealer).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!("could not read decision, standing: {e}");
                Decision::Stand
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_core::{Card, Suit};

    fn hand(ranks: &[u8]) -> Hand {
        let mut h = Hand::new();
        for &r in ranks {
            h.push(Card::new(r, Suit::Diamond).unwrap());
        }
        h
    }

    #[test]
    fn test_parse_rounds_defaults_and_clamps() {
        assert_eq!(parse_rounds("\n"), 1);
        assert_eq!(parse_rounds("abc\n"), 1);
        assert_eq!(parse_rounds("0\n"), 1);
        assert_eq!(parse_rounds("-4"), 1);
        assert_eq!(parse_rounds(" 7 \n"), 7);
        assert_eq!(parse_rounds("1000"), 255);
    }

    #[tokio::test]
    async fn test_prompt_rounds_writes_prompt_and_reads_answer() {
        // Arrange
        let mut input: &[u8] = b"3\n";
        let mut output = Vec::new();

        // Act
        let rounds = prompt_rounds(&mut input, &mut output).await.unwrap();

        // Assert
        assert_eq!(rounds, 3);
        assert!(String::from_utf8(output).unwrap().contains("Enter number of rounds"));
    }

    #[tokio::test]
    async fn test_console_decider_reads_hit_and_stand() {
        // Arrange
        let input: &[u8] = b"h\nStand\nHIT\n";
        let mut decider = ConsoleDecider::new(input, Vec::new());
        let (player, dealer) = (hand(&[10, 2]), hand(&[9]));

        // Act
        let first = decider.decide(&player, &dealer).await;
        let second = decider.decide(&player, &dealer).await;
        let third = decider.decide(&player, &dealer).await;

        // Assert
        assert_eq!(
            (first, second, third),
            (Decision::Hit, Decision::Stand, Decision::Hit)
        );
    }

    #[tokio::test]
    async fn test_console_decider_stands_at_end_of_input() {
        let input: &[u8] = b"";
        let mut decider = ConsoleDecider::new(input, Vec::new());

        let decision = decider.decide(&hand(&[5, 5]), &hand(&[10])).await;

        assert_eq!(decision, Decision::Stand);
    }

    #[tokio::test]
    async fn test_console_decider_shows_both_hands() {
        let input: &[u8] = b"s\n";
        let mut decider = ConsoleDecider::new(input, Vec::new());

        decider.decide(&hand(&[1, 12]), &hand(&[7])).await;

        let (_, output) = decider.into_inner();
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Ace of Diamond"), "{shown}");
        assert!(shown.contains("total 21"), "{shown}");
        assert!(shown.contains("Hit or Stand? [h/s]"), "{shown}");
    }

    #[tokio::test]
    async fn test_rounds_prompt_and_decider_share_one_reader() {
        // Arrange: piped input arrives in one chunk, so the first fill buffers
        // both lines
        let mut reader = BufReader::new(&b"3\nh\n"[..]);
        let mut output = Vec::new();

        // Act
        let rounds = prompt_rounds(&mut reader, &mut output).await.unwrap();
        let mut decider = ConsoleDecider::new(reader, output);
        let decision = decider.decide(&hand(&[10, 2]), &hand(&[9])).await;

        // Assert
        assert_eq!(rounds, 3);
        assert_eq!(decision, Decision::Hit);
    }
}
