//! Operator commands typed at the console prompt.

use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  cart              show the cart and its total
  remove <code>     drop a line from the cart
  clear             empty the cart
  checkout          send the cart to the store and print the receipt
  inventory         list products, flagging low stock
  history [n]       show the last n ledger lines (default 20)
  update <id>       edit a product's name, prices, discount and stock
  delete <id>       remove a product from the catalog
  ip                show the server address for the phone scanner
  help              show this list
  quit              exit";

pub const DEFAULT_HISTORY: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Cart,
    Remove(String),
    Clear,
    Checkout,
    Inventory,
    History(i64),
    Update(i64),
    Delete(i64),
    Ip,
    Help,
    Quit,
    /// Blank line.
    Nothing,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(Command::Nothing);
        };
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("Too many arguments for '{name}'"));
        }

        let command = match (name.to_ascii_lowercase().as_str(), arg) {
            ("cart", None) => Command::Cart,
            ("remove", Some(code)) => Command::Remove(code.to_string()),
            ("remove", None) => return Err("Usage: remove <code>".to_string()),
            ("clear", None) => Command::Clear,
            ("checkout", None) => Command::Checkout,
            ("inventory", None) => Command::Inventory,
            ("history", None) => Command::History(DEFAULT_HISTORY),
            ("history", Some(n)) => Command::History(parse_number(n, "history [n]")?),
            ("update", Some(id)) => Command::Update(parse_number(id, "update <id>")?),
            ("update", None) => return Err("Usage: update <id>".to_string()),
            ("delete", Some(id)) => Command::Delete(parse_number(id, "delete <id>")?),
            ("delete", None) => return Err("Usage: delete <id>".to_string()),
            ("ip", None) => Command::Ip,
            ("help" | "?", None) => Command::Help,
            ("quit" | "exit", None) => Command::Quit,
            (
                known @ ("cart" | "clear" | "checkout" | "inventory" | "ip" | "help" | "?"
                | "quit" | "exit"),
                Some(_),
            ) => return Err(format!("'{known}' takes no arguments")),
            (other, _) => return Err(format!("Unknown command '{other}', type 'help'")),
        };
        Ok(command)
    }
}

fn parse_number(raw: &str, usage: &str) -> Result<i64, String> {
    match raw.parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Usage: {usage}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("cart".parse(), Ok(Command::Cart));
        assert_eq!("  CHECKOUT ".parse(), Ok(Command::Checkout));
        assert_eq!("remove 5012345678900".parse(), Ok(Command::Remove("5012345678900".into())));
        assert_eq!("history".parse(), Ok(Command::History(DEFAULT_HISTORY)));
        assert_eq!("history 5".parse(), Ok(Command::History(5)));
        assert_eq!("update 3".parse(), Ok(Command::Update(3)));
        assert_eq!("delete 3".parse(), Ok(Command::Delete(3)));
        assert_eq!("exit".parse(), Ok(Command::Quit));
        assert_eq!("".parse(), Ok(Command::Nothing));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("update".parse::<Command>(), Err("Usage: update <id>".to_string()));
        assert_eq!("delete x".parse::<Command>(), Err("Usage: delete <id>".to_string()));
        assert_eq!("history 0".parse::<Command>(), Err("Usage: history [n]".to_string()));
        assert!("cart now".parse::<Command>().is_err());
        assert!("checkout 1 2".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().unwrap_err().contains("Unknown command"));
    }
}
