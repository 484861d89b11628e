use super::cursor::Cursor;
use super::span::Span;
use super::token::{SpannedToken, Token};

pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer from source.
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            cursor: Cursor::new(source),
        }
    }

    /// Returns the next token.
    pub fn next_token(&mut self) -> SpannedToken {
        loop {
            // Get rid of whitespace.
            self.cursor.take_while(|ch| ch.is_ascii_whitespace());

            let start_pos = self.cursor.get_position();
            let token = self.lex_token();
            let end_pos = self.cursor.get_position();

            if let Some(token) = token {
                return SpannedToken {
                    token,
                    span: Span::new(start_pos, end_pos),
                };
            }
        }
    }

    fn lex_token(&mut self) -> Option<Token> {
        let (byte_idx, ch) = match self.cursor.take() {
            Some(t) => t,
            None => return Some(Token::EndOfFile),
        };

        let token = match ch {
            // Single-character tokens.
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Asterisk,
            '%' => Token::Percent,
            '.' => Token::Dot,
            ',' => Token::Comma,
            ';' => Token::Semicolon,

            // Slash can either be comment or division.
            '/' => {
                if self.cursor.take_if('/') {
                    // Comment case.
                    self.consume_line();
                    return None;
                } else {
                    // Division case.
                    Token::Slash
                }
            }

            // Potentially two character tokens.
            '=' => self.look_for_eq_sign(Token::Equals, Token::DoubleEq),
            '<' => self.look_for_eq_sign(Token::LeftAngle, Token::LeftAngleEq),
            '>' => self.look_for_eq_sign(Token::RightAngle, Token::RightAngleEq),
            '!' => self.look_for_eq_sign(Token::Bang, Token::BangEq),

            // String literals.
            '"' => self.lex_string(),

            // Numbers.
            _ if is_digit_char(ch) => self.lex_number(byte_idx),

            // Identifiers.
            _ if is_identifier_char(ch) => self.lex_identifier_or_kw(byte_idx),

            // Unrecognized token.
            _ => Token::LexerError(format!("Unexpected character `{}`", ch)),
        };

        Some(token)
    }

    fn consume_line(&mut self) {
        // Consume chars.
        self.cursor.take_while(|ch| ch != '\n');
        // Consume newline char.
        self.cursor.take();
    }

    /// Checks if next char is '='. If so, consume it and return t2.
    /// Otherwise, return t1.
    fn look_for_eq_sign(&mut self, t1: Token, t2: Token) -> Token {
        if self.cursor.take_if('=') {
            t2
        } else {
            t1
        }
    }

    /// Scans string up to the next unescaped '"'. Only `\"` and `\\` are
    /// escape sequences; any other backslash is kept literally.
    fn lex_string(&mut self) -> Token {
        let mut value = String::new();

        loop {
            match self.cursor.take() {
                None => return Token::LexerError("Unterminated string.".to_owned()),
                Some((_, '"')) => return Token::String(value),
                Some((_, '\\')) => match self.cursor.take() {
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, other)) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => return Token::LexerError("Unterminated string.".to_owned()),
                },
                Some((_, ch)) => value.push(ch),
            }
        }
    }

    /// Scans a number and returns it.
    fn lex_number(&mut self, start_idx: usize) -> Token {
        self.cursor.take_while(is_digit_char);

        // Check for period in float.
        if let Some((_, '.')) = self.cursor.peek() {
            if self
                .cursor
                .peek_next()
                .map_or(false, |t| is_digit_char(t.1))
            {
                self.cursor.take();
                self.cursor.take_while(is_digit_char);
            }
        }

        let end_idx = match self.cursor.peek() {
            None => self.source.len(),
            Some((i, _)) => i,
        };

        let scanned_number = &self.source[start_idx..end_idx];
        match scanned_number.parse() {
            Ok(value) => Token::Number(value),
            Err(_) => Token::LexerError(format!("Unparsable number `{}`", scanned_number)),
        }
    }

    /// Scan up to end of lexemme and return it as identifier. Checks for keywords.
    fn lex_identifier_or_kw(&mut self, start_idx: usize) -> Token {
        self.cursor.take_while(is_identifier_char);

        let end_idx = match self.cursor.peek() {
            None => self.source.len(),
            Some((i, _)) => i,
        };

        match &self.source[start_idx..end_idx] {
            "and" => Token::And,
            "create" => Token::Create,
            "else" => Token::Else,
            "false" => Token::False,
            "func" => Token::Func,
            "for" => Token::For,
            "if" => Token::If,
            "null" => Token::Null,
            "not" => Token::Not,
            "or" => Token::Or,
            "output" => Token::Output,
            "return" => Token::Return,
            "true" => Token::True,
            "while" => Token::While,
            other => Token::Identifier(other.to_owned()),
        }
    }
}

/// Scans a whole source string eagerly, separating malformed tokens out as
/// error messages. Used by the token-dump surface; the parser drives the
/// lexer directly instead.
pub fn scan_all(source: &str) -> (Vec<SpannedToken>, Vec<String>) {
    let mut lexer = Lexer::new(source);
    let mut tokens = vec![];
    let mut errors = vec![];

    loop {
        let spanned = lexer.next_token();
        match &spanned.token {
            Token::LexerError(message) => {
                errors.push(format!("[line {}] {}", spanned.span.line(), message));
            }
            Token::EndOfFile => {
                tokens.push(spanned);
                break;
            }
            _ => tokens.push(spanned),
        }
    }

    (tokens, errors)
}

fn is_digit_char(ch: char) -> bool {
    ch.is_ascii_digit()
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
