//! 终端命令解析

use crate::error::CommandError;
use crate::models::{Filter, Mode, SortDirection};

/// 帮助文本
pub const HELP: &str = "\
命令:
  n / p              下一页 / 上一页
  g <页码>           跳到指定页
  c <分类|all|*>     按分类筛选（all 或 * 为全部）
  t <主题|all|*>     按主题筛选（all 或 * 为全部）
  s [关键词]         搜索题干（不带关键词则清除）
  m quiz|study       切换答题 / 背题模式
  x                  打乱顺序开关
  o asc|desc         按编号排序方向
  a <题号> <选项>    作答（题号、选项均从 1 开始）
  b <题号>           收藏 / 取消收藏
  cart               只看收藏开关
  tree               显示分类树
  h                  帮助
  q                  退出";

/// 终端命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    Goto(usize),
    Category(Filter),
    Topic(Filter),
    Search(String),
    Mode(Mode),
    ToggleShuffle,
    Sort(SortDirection),
    /// `card` 和 `option` 都从 1 开始
    Answer { card: usize, option: usize },
    ToggleCart(usize),
    CartOnly,
    Tree,
    Help,
    Quit,
}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "n" | "next" => Ok(Command::Next),
            "p" | "prev" => Ok(Command::Prev),
            "g" | "go" => Ok(Command::Goto(number(name, rest, "页码")?)),
            "c" | "cat" => Ok(Command::Category(named(required(name, rest, "分类")?))),
            "t" | "topic" => Ok(Command::Topic(named(required(name, rest, "主题")?))),
            "s" | "search" => Ok(Command::Search(rest.to_string())),
            "m" | "mode" => required(name, rest, "quiz|study")?
                .parse()
                .map(Command::Mode)
                .map_err(|value| CommandError::InvalidArgument {
                    value,
                    expected: "quiz|study",
                }),
            "x" | "shuffle" => Ok(Command::ToggleShuffle),
            "o" | "sort" => required(name, rest, "asc|desc")?
                .parse()
                .map(Command::Sort)
                .map_err(|value| CommandError::InvalidArgument {
                    value,
                    expected: "asc|desc",
                }),
            "a" | "answer" => {
                let mut args = rest.split_whitespace();
                let card = number(name, args.next().unwrap_or(""), "题号")?;
                let option = number(name, args.next().unwrap_or(""), "选项")?;
                Ok(Command::Answer { card, option })
            }
            "b" | "bookmark" => Ok(Command::ToggleCart(number(name, rest, "题号")?)),
            "cart" => Ok(Command::CartOnly),
            "tree" => Ok(Command::Tree),
            "h" | "help" | "?" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}

fn required<'a>(command: &str, rest: &'a str, argument: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument {
            command: command.to_string(),
            argument,
        })
    } else {
        Ok(rest)
    }
}

/// `*` 表示全部；其余按名字原样保留，`all` 由会话对照分类树解析
fn named(rest: &str) -> Filter {
    if rest == "*" {
        Filter::Any
    } else {
        Filter::Only(rest.to_string())
    }
}

fn number(command: &str, rest: &str, argument: &'static str) -> Result<usize, CommandError> {
    let value = required(command, rest, argument)?;
    value.parse().map_err(|_| CommandError::InvalidArgument {
        value: value.to_string(),
        expected: "正整数",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation_and_filters() {
        assert_eq!("n".parse::<Command>(), Ok(Command::Next));
        assert_eq!("g 4".parse::<Command>(), Ok(Command::Goto(4)));
        assert_eq!(
            "c General Knowledge".parse::<Command>(),
            Ok(Command::Category(Filter::Only("General Knowledge".to_string())))
        );
        assert_eq!("t *".parse::<Command>(), Ok(Command::Topic(Filter::Any)));
        assert_eq!(
            "t All".parse::<Command>(),
            Ok(Command::Topic(Filter::Only("All".to_string())))
        );
        assert_eq!("s".parse::<Command>(), Ok(Command::Search(String::new())));
        assert_eq!("m STUDY".parse::<Command>(), Ok(Command::Mode(Mode::Study)));
        assert_eq!("o desc".parse::<Command>(), Ok(Command::Sort(SortDirection::Desc)));
    }

    #[test]
    fn parses_answer() {
        assert_eq!(
            "a 2 3".parse::<Command>(),
            Ok(Command::Answer { card: 2, option: 3 })
        );
        assert!(matches!(
            "a 2".parse::<Command>(),
            Err(CommandError::MissingArgument { argument: "选项", .. })
        ));
    }

    #[test]
    fn reports_bad_input() {
        assert!(matches!("g x".parse::<Command>(), Err(CommandError::InvalidArgument { .. })));
        assert!(matches!("m exam".parse::<Command>(), Err(CommandError::InvalidArgument { .. })));
        assert!(matches!("jump".parse::<Command>(), Err(CommandError::Unknown(_))));
    }
}
