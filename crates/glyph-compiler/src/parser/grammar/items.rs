//! Top-level item parsing: types, providers, routes, functions, commands,
//! workers, and imports.

use glyph_ast::{
    AuthConfig, Command, CommandParam, ConstDecl, CronTask, EventHandler, Field, Function,
    HttpMethod, ImportName, ImportStatement, Injection, Item, ModuleDecl, Param, ProviderDef,
    ProviderMethod, QueueWorker, RateLimit, Route, Statement, TypeDef, WebSocketEvent,
    WebSocketRoute, WsEventKind,
};

use crate::lexer::{TokenKind, unescape};
use crate::parser::{ParseError, Parser};

impl Parser<'_> {
    /// `: Name { field: type! }` - the leading `:` or `type` keyword is
    /// already consumed.
    pub(super) fn parse_type_def(&mut self) -> Result<TypeDef, ParseError> {
        let name = self.expect_ident()?;
        self.expect(TokenKind::LBrace, "'{' after type name")?;
        self.skip_newlines();

        let mut fields = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.at_end() {
            let field_name = self.expect_ident()?;
            self.expect(TokenKind::Colon, "':' after field name")?;
            let (ty, required) = self.parse_type()?;
            fields.push(Field {
                name: field_name,
                ty,
                required,
            });
            self.skip_newlines();
        }

        self.expect(TokenKind::RBrace, "'}' to close type definition")?;
        Ok(TypeDef { name, fields })
    }

    /// `provider Name<T> { method(param: type!) -> type }` - the `provider`
    /// keyword is already consumed.
    pub(super) fn parse_provider_def(&mut self) -> Result<ProviderDef, ParseError> {
        let name = self.expect_ident()?;

        let mut type_params = Vec::new();
        if self.eat(TokenKind::Less) {
            type_params.push(self.expect_ident()?);
            while self.eat(TokenKind::Comma) {
                type_params.push(self.expect_ident()?);
            }
            self.expect(TokenKind::Greater, "'>' to close type parameters")?;
        }

        self.expect(TokenKind::LBrace, "'{' after provider name")?;
        self.skip_newlines();

        let mut methods = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.at_end() {
            let method_name = self.expect_ident()?;
            let params = self.parse_param_list()?;
            let return_type = if self.eat(TokenKind::Arrow) {
                Some(self.parse_type()?.0)
            } else {
                None
            };
            methods.push(ProviderMethod {
                name: method_name,
                params,
                return_type,
            });
            self.skip_newlines();
        }

        self.expect(TokenKind::RBrace, "'}' to close provider definition")?;
        Ok(ProviderDef {
            name,
            type_params,
            methods,
        })
    }

    /// Dispatches `@ <keyword> ...` items: routes, websocket routes, and the
    /// long forms of commands, crons, events, and queue workers.
    pub(super) fn parse_at_item(&mut self) -> Result<Item, ParseError> {
        let keyword_token = self.current();
        let keyword = self.expect_ident()?;

        match keyword.as_str() {
            "ws" | "websocket" => return self.parse_websocket_route().map(Item::WebSocket),
            "command" | "cmd" => {
                let name = self.expect_ident()?;
                return self.parse_command(name).map(Item::Command);
            }
            "cron" | "schedule" => return self.parse_cron_task().map(Item::Cron),
            "event" | "on" => return self.parse_event_handler().map(Item::Event),
            "queue" | "worker" => return self.parse_queue_worker().map(Item::Queue),
            _ => {}
        }

        let method_keyword = match keyword.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            "ROUTE" => None,
            _ => {
                return Err(self.error_at(
                    format!(
                        "expected 'route', 'ws', 'websocket', or an HTTP method after '@', \
                         but found '{keyword}'"
                    ),
                    keyword_token,
                ));
            }
        };

        self.parse_route(method_keyword).map(Item::Route)
    }

    /// `@ GET /users/:id -> User { ... }` or `@ route /path [METHOD] ...`.
    fn parse_route(&mut self, method_keyword: Option<HttpMethod>) -> Result<Route, ParseError> {
        let path = self.parse_route_path()?;

        let method = match method_keyword {
            Some(method) => method,
            None => {
                // `@ route /path [METHOD]`, defaulting to GET
                if self.eat(TokenKind::LBracket) {
                    let name = self.expect_ident()?;
                    let method = self.http_method_from_name(&name)?;
                    self.expect(TokenKind::RBracket, "']' after HTTP method")?;
                    method
                } else {
                    HttpMethod::Get
                }
            }
        };

        let return_type = if self.eat(TokenKind::Arrow) {
            Some(self.parse_type()?.0)
        } else {
            None
        };

        let mut route = Route {
            method,
            path,
            return_type,
            auth: None,
            rate_limit: None,
            injections: Vec::new(),
            body: Vec::new(),
        };
        self.parse_route_body(&mut route)?;
        Ok(route)
    }

    /// Assembles a route path from `/`-separated segments. `:name` segments
    /// are parameters; segments may contain hyphens. A path starting with a
    /// bare identifier is accepted as-is - rejecting the missing leading
    /// `/` is the validator's job.
    fn parse_route_path(&mut self) -> Result<String, ParseError> {
        let mut path = String::new();

        if self.check(TokenKind::Ident) {
            self.push_path_segment(&mut path);
        } else if !self.check(TokenKind::Slash) {
            return Err(self.error(format!(
                "expected route path, but found {}; route paths must start with '/'",
                self.describe_current()
            )));
        }

        while self.check(TokenKind::Slash) {
            path.push('/');
            self.advance();

            if self.check(TokenKind::Colon) {
                path.push(':');
                self.advance();
            }

            if !self.check(TokenKind::Ident) {
                break;
            }
            self.push_path_segment(&mut path);
        }
        Ok(path)
    }

    /// One path segment: an identifier, possibly hyphenated like
    /// `order-status`.
    fn push_path_segment(&mut self, path: &mut String) {
        path.push_str(self.current_text());
        self.advance();
        while self.check(TokenKind::Minus) && self.peek_kind(1) == TokenKind::Ident {
            self.advance();
            path.push('-');
            path.push_str(self.current_text());
            self.advance();
        }
    }

    fn http_method_from_name(&self, name: &str) -> Result<HttpMethod, ParseError> {
        match name.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            _ => Err(self.error(format!("unknown HTTP method '{name}'"))),
        }
    }

    /// Route bodies come braced or inline. Injections (`%`), middleware
    /// (`+`), and input bindings (`<`) are accepted in both forms, before
    /// or between statements.
    fn parse_route_body(&mut self, route: &mut Route) -> Result<(), ParseError> {
        self.skip_newlines();

        if self.eat(TokenKind::LBrace) {
            self.skip_newlines();
            while !self.check(TokenKind::RBrace) && !self.at_end() {
                if self.parse_route_prelude(route)? {
                    self.skip_newlines();
                    continue;
                }
                let stmt = self.parse_statement()?;
                route.body.push(stmt);
                self.skip_newlines();
            }
            self.expect(TokenKind::RBrace, "'}' to close route body")?;
            return Ok(());
        }

        loop {
            if self.eat(TokenKind::Newline) {
                continue;
            }
            if self.parse_route_prelude(route)? {
                continue;
            }
            match self.kind() {
                TokenKind::Dollar
                | TokenKind::Greater
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For => {
                    let stmt = self.parse_statement()?;
                    route.body.push(stmt);
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Consumes one prelude line if present: `% name: Type` injection,
    /// `+ auth(...)` / `+ ratelimit(...)` middleware, or `< name: Type`
    /// input binding (parsed and discarded).
    fn parse_route_prelude(&mut self, route: &mut Route) -> Result<bool, ParseError> {
        match self.kind() {
            TokenKind::Percent => {
                self.advance();
                route.injections.push(self.parse_injection()?);
                Ok(true)
            }
            TokenKind::Plus => {
                self.advance();
                let name = self.expect_ident()?;
                match name.as_str() {
                    "auth" => route.auth = Some(self.parse_auth_config()?),
                    "ratelimit" => route.rate_limit = Some(self.parse_rate_limit()?),
                    _ => self.skip_parenthesized_args()?,
                }
                Ok(true)
            }
            TokenKind::Less => {
                self.advance();
                self.expect_ident()?;
                self.expect(TokenKind::Colon, "':' after input binding name")?;
                self.parse_type()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn parse_injection(&mut self) -> Result<Injection, ParseError> {
        let name = self.expect_ident()?;
        self.expect(TokenKind::Colon, "':' after injection name")?;
        let (ty, _) = self.parse_type()?;
        Ok(Injection { name, ty })
    }

    /// `+ auth(jwt)`
    fn parse_auth_config(&mut self) -> Result<AuthConfig, ParseError> {
        self.expect(TokenKind::LParen, "'(' after 'auth'")?;
        let scheme = self.expect_ident()?;
        self.expect(TokenKind::RParen, "')' after auth scheme")?;
        Ok(AuthConfig { scheme })
    }

    /// `+ ratelimit(100/min)`
    fn parse_rate_limit(&mut self) -> Result<RateLimit, ParseError> {
        self.expect(TokenKind::LParen, "'(' after 'ratelimit'")?;
        let requests = self.parse_u32()?;
        self.expect(TokenKind::Slash, "'/' in rate limit")?;
        let window = self.expect_ident()?;
        self.expect(TokenKind::RParen, "')' after rate limit")?;
        Ok(RateLimit { requests, window })
    }

    fn skip_parenthesized_args(&mut self) -> Result<(), ParseError> {
        if !self.eat(TokenKind::LParen) {
            return Ok(());
        }
        let mut depth = 1usize;
        while depth > 0 && !self.at_end() {
            match self.kind() {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth -= 1,
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    fn parse_u32(&mut self) -> Result<u32, ParseError> {
        if !self.check(TokenKind::Int) {
            return Err(self.error(format!(
                "expected integer, but found {}",
                self.describe_current()
            )));
        }
        let value = self
            .current_text()
            .parse()
            .map_err(|_| self.error("integer literal out of range"))?;
        self.advance();
        Ok(value)
    }

    /// `@ ws /chat { on connect { ... } on message { ... } }` - the `ws`
    /// keyword is already consumed.
    fn parse_websocket_route(&mut self) -> Result<WebSocketRoute, ParseError> {
        if !self.check(TokenKind::Slash) {
            return Err(self.error(format!(
                "expected WebSocket path, but found {}; WebSocket paths must start with '/'",
                self.describe_current()
            )));
        }
        let path = self.parse_route_path()?;
        self.skip_newlines();
        self.expect(TokenKind::LBrace, "'{' to open WebSocket route body")?;
        self.skip_newlines();

        let mut events = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.at_end() {
            if !(self.check(TokenKind::Ident) && self.current_text() == "on") {
                break;
            }
            self.advance();
            let event_token = self.current();
            let event_name = self.expect_ident()?;
            let kind = match event_name.as_str() {
                "connect" => WsEventKind::Connect,
                "message" => WsEventKind::Message,
                "disconnect" => WsEventKind::Disconnect,
                "error" => WsEventKind::Error,
                other => {
                    return Err(self.error_at(
                        format!(
                            "unknown WebSocket event '{other}'; valid events are: \
                             connect, message, disconnect, error"
                        ),
                        event_token,
                    ));
                }
            };
            let body = self.parse_block()?;
            events.push(WebSocketEvent { kind, body });
            self.skip_newlines();
        }

        self.expect(TokenKind::RBrace, "'}' to close WebSocket route")?;
        Ok(WebSocketRoute { path, events })
    }

    /// `! name(...)` is a function, `! name ...` a CLI command. The `!` is
    /// already consumed.
    pub(super) fn parse_bang_item(&mut self) -> Result<Item, ParseError> {
        let name = self.expect_ident()?;
        if self.check(TokenKind::LParen) {
            self.parse_function(name).map(Item::Function)
        } else {
            self.parse_command(name).map(Item::Command)
        }
    }

    /// `! getUser(id: int!): User { ... }` - name already consumed.
    fn parse_function(&mut self, name: String) -> Result<Function, ParseError> {
        let params = self.parse_param_list()?;

        let return_type = if self.eat(TokenKind::Colon) || self.eat(TokenKind::Arrow) {
            Some(self.parse_type()?.0)
        } else {
            None
        };

        self.skip_newlines();
        let body = self.parse_block()?;
        Ok(Function {
            name,
            params,
            return_type,
            body,
        })
    }

    /// `(name: type!, other: type = default)`
    fn parse_param_list(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(TokenKind::LParen, "'(' to open parameter list")?;
        self.skip_newlines();
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) && !self.at_end() {
            let name = self.expect_ident()?;
            self.expect(TokenKind::Colon, "':' after parameter name")?;
            let (ty, required) = self.parse_type()?;
            let default = if self.eat(TokenKind::Equals) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            params.push(Param {
                name,
                ty,
                required,
                default,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.expect(TokenKind::RParen, "')' to close parameter list")?;
        Ok(params)
    }

    /// `! deploy "Deploy the app" env: str! --verbose: bool { ... }` - name
    /// already consumed.
    fn parse_command(&mut self, name: String) -> Result<Command, ParseError> {
        let description = if self.check(TokenKind::Str) {
            let text = unescape(self.current_text());
            self.advance();
            Some(text)
        } else {
            None
        };
        self.skip_newlines();

        let mut params = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenKind::LBrace) || self.check(TokenKind::Arrow) || self.at_end() {
                break;
            }

            let mut is_flag = false;
            if self.check(TokenKind::Minus) {
                self.advance();
                self.eat(TokenKind::Minus);
                is_flag = true;
            }

            if !self.check(TokenKind::Ident) {
                break;
            }
            let param_name = self.expect_ident()?;

            let (ty, required) = if self.eat(TokenKind::Colon) {
                let (ty, required) = self.parse_type()?;
                (Some(ty), required)
            } else {
                (None, false)
            };

            let default = if self.eat(TokenKind::Equals) {
                Some(self.parse_expr()?)
            } else {
                None
            };

            params.push(CommandParam {
                name: param_name,
                ty,
                required,
                is_flag,
                default,
            });
        }

        let return_type = if self.eat(TokenKind::Arrow) {
            Some(self.parse_type()?.0)
        } else {
            None
        };
        self.skip_newlines();

        let body = if self.check(TokenKind::LBrace) {
            self.parse_block()?
        } else {
            self.parse_inline_statements()?
        };

        Ok(Command {
            name,
            description,
            params,
            return_type,
            body,
        })
    }

    /// `* "0 0 * * *" daily_cleanup tz "UTC" { ... }` - the `*` or `cron`
    /// keyword is already consumed.
    pub(super) fn parse_cron_task(&mut self) -> Result<CronTask, ParseError> {
        if !self.check(TokenKind::Str) {
            return Err(self.error(format!(
                "expected cron schedule string, but found {}",
                self.describe_current()
            )));
        }
        let schedule = unescape(self.current_text());
        self.advance();

        let mut name = None;
        if self.check(TokenKind::Ident) && self.current_text() != "tz" {
            name = Some(self.current_text().to_owned());
            self.advance();
        }

        let mut timezone = None;
        if self.check(TokenKind::Ident) && self.current_text() == "tz" {
            self.advance();
            if self.check(TokenKind::Str) {
                timezone = Some(unescape(self.current_text()));
                self.advance();
            }
        }
        self.skip_newlines();

        let mut task = CronTask {
            name,
            schedule,
            timezone,
            retries: 0,
            injections: Vec::new(),
            body: Vec::new(),
        };

        if self.eat(TokenKind::LBrace) {
            self.skip_newlines();
            while !self.check(TokenKind::RBrace) && !self.at_end() {
                match self.kind() {
                    TokenKind::Percent => {
                        self.advance();
                        task.injections.push(self.parse_injection()?);
                    }
                    TokenKind::Plus => {
                        self.advance();
                        let config = self.expect_ident()?;
                        let value = self.parse_config_value()?;
                        if config == "retries" {
                            task.retries = value;
                        }
                    }
                    _ => task.body.push(self.parse_statement()?),
                }
                self.skip_newlines();
            }
            self.expect(TokenKind::RBrace, "'}' to close cron task body")?;
        }

        Ok(task)
    }

    /// `~ "user.created" async { ... }` - the `~` or `event` keyword is
    /// already consumed. Unquoted dotted names are accepted too.
    pub(super) fn parse_event_handler(&mut self) -> Result<EventHandler, ParseError> {
        let event = self.parse_dotted_name("event type")?;

        let mut is_async = false;
        if self.check(TokenKind::Ident) && self.current_text() == "async" {
            is_async = true;
            self.advance();
        }
        self.skip_newlines();

        let mut handler = EventHandler {
            event,
            is_async,
            injections: Vec::new(),
            body: Vec::new(),
        };

        if self.eat(TokenKind::LBrace) {
            self.skip_newlines();
            while !self.check(TokenKind::RBrace) && !self.at_end() {
                if self.check(TokenKind::Percent) {
                    self.advance();
                    handler.injections.push(self.parse_injection()?);
                } else {
                    handler.body.push(self.parse_statement()?);
                }
                self.skip_newlines();
            }
            self.expect(TokenKind::RBrace, "'}' to close event handler body")?;
        }

        Ok(handler)
    }

    /// `& "email.send" { + concurrency(5) + retries(3) + timeout(30) ... }` -
    /// the `&` or `queue` keyword is already consumed.
    pub(super) fn parse_queue_worker(&mut self) -> Result<QueueWorker, ParseError> {
        let queue = self.parse_dotted_name("queue name")?;
        self.skip_newlines();

        let mut worker = QueueWorker {
            queue,
            concurrency: 0,
            max_retries: 0,
            timeout: 0,
            injections: Vec::new(),
            body: Vec::new(),
        };

        if self.eat(TokenKind::LBrace) {
            self.skip_newlines();
            while !self.check(TokenKind::RBrace) && !self.at_end() {
                match self.kind() {
                    TokenKind::Percent => {
                        self.advance();
                        worker.injections.push(self.parse_injection()?);
                    }
                    TokenKind::Plus => {
                        self.advance();
                        let config = self.expect_ident()?;
                        let value = self.parse_config_value()?;
                        match config.as_str() {
                            "concurrency" => worker.concurrency = value,
                            "retries" => worker.max_retries = value,
                            "timeout" => worker.timeout = value,
                            _ => {}
                        }
                    }
                    _ => worker.body.push(self.parse_statement()?),
                }
                self.skip_newlines();
            }
            self.expect(TokenKind::RBrace, "'}' to close queue worker body")?;
        }

        Ok(worker)
    }

    /// `+ retries(3)` style worker configuration; the config name is
    /// already consumed.
    fn parse_config_value(&mut self) -> Result<u32, ParseError> {
        self.expect(TokenKind::LParen, "'(' after configuration name")?;
        let value = self.parse_u32()?;
        self.expect(TokenKind::RParen, "')' after configuration value")?;
        Ok(value)
    }

    /// A quoted string or an unquoted dotted name like `user.created`.
    fn parse_dotted_name(&mut self, what: &str) -> Result<String, ParseError> {
        if self.check(TokenKind::Str) {
            let text = unescape(self.current_text());
            self.advance();
            return Ok(text);
        }

        if !self.check(TokenKind::Ident) {
            return Err(self.error(format!(
                "expected {what}, but found {}",
                self.describe_current()
            )));
        }

        let mut name = self.current_text().to_owned();
        self.advance();
        while self.check(TokenKind::Dot) && self.peek_kind(1) == TokenKind::Ident {
            self.advance();
            name.push('.');
            name.push_str(self.current_text());
            self.advance();
        }
        Ok(name)
    }

    /// `import "./models" as m`
    pub(super) fn parse_plain_import(&mut self) -> Result<ImportStatement, ParseError> {
        self.expect(TokenKind::Import, "'import'")?;
        let path = self.parse_string("import path")?;
        let alias = if self.eat(TokenKind::As) {
            Some(self.expect_ident()?)
        } else {
            None
        };
        Ok(ImportStatement {
            path,
            alias,
            selective: false,
            names: Vec::new(),
        })
    }

    /// `from "./models" import { User, Post as P }`
    pub(super) fn parse_selective_import(&mut self) -> Result<ImportStatement, ParseError> {
        self.expect(TokenKind::From, "'from'")?;
        let path = self.parse_string("import path")?;
        self.expect(TokenKind::Import, "'import' after module path")?;
        self.expect(TokenKind::LBrace, "'{' to open import list")?;
        self.skip_newlines();

        let mut names = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.at_end() {
            let name = self.expect_ident()?;
            let alias = if self.eat(TokenKind::As) {
                Some(self.expect_ident()?)
            } else {
                None
            };
            names.push(ImportName { name, alias });
            self.skip_newlines();
            if !self.eat(TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }

        self.expect(TokenKind::RBrace, "'}' to close import list")?;
        Ok(ImportStatement {
            path,
            alias: None,
            selective: true,
            names,
        })
    }

    /// `module "myapp/utils"`
    pub(super) fn parse_module_decl(&mut self) -> Result<ModuleDecl, ParseError> {
        self.expect(TokenKind::Module, "'module'")?;
        let name = self.parse_string("module name")?;
        Ok(ModuleDecl { name })
    }

    /// `const MAX_RETRIES = 3`
    pub(super) fn parse_const_decl(&mut self) -> Result<ConstDecl, ParseError> {
        self.expect(TokenKind::Const, "'const'")?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Equals, "'=' after constant name")?;
        let value = self.parse_expr()?;
        Ok(ConstDecl { name, value })
    }

    fn parse_string(&mut self, what: &str) -> Result<String, ParseError> {
        if !self.check(TokenKind::Str) {
            return Err(self.error(format!(
                "expected {what} string, but found {}",
                self.describe_current()
            )));
        }
        let text = unescape(self.current_text());
        self.advance();
        Ok(text)
    }

    /// Inline `$`/`>` statements until something that isn't part of a body.
    fn parse_inline_statements(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut body = Vec::new();
        loop {
            if self.eat(TokenKind::Newline) {
                continue;
            }
            match self.kind() {
                TokenKind::Dollar | TokenKind::Greater => body.push(self.parse_statement()?),
                _ => break,
            }
        }
        Ok(body)
    }
}
