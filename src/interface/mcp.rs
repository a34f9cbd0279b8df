//! MCP Server for bookshelf-mcp
//!
//! MCP Protocol (stdio) <-> application::LibraryService
//!
//! 5 tools: books, book_detail, borrow, return_book, borrowed

use std::sync::Arc;

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::error::AppError;
use crate::application::service::LibraryService;
use crate::config::StoreConfig;
use crate::domain::model::borrow::MAX_BORROWED;
use crate::domain::model::id::BookId;
use crate::infra::json_store::JsonDocumentStore;

use super::render::{render_borrowed, render_catalog, render_detail};

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。ストアはJSONファイル1つ。
pub async fn run(config: StoreConfig) -> anyhow::Result<()> {
    let server = BookshelfMcpServer::new(JsonDocumentStore::new(config.path));
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

#[derive(Clone)]
struct BookshelfMcpServer {
    library: Arc<LibraryService<JsonDocumentStore>>,
    tool_router: ToolRouter<Self>,
}

impl BookshelfMcpServer {
    fn new(store: JsonDocumentStore) -> Self {
        Self {
            library: Arc::new(LibraryService::new(store)),
            tool_router: Self::tool_router(),
        }
    }

    /// ドメイン上の拒否・存在しない書籍は入力エラー、ストア障害は内部エラー。
    fn to_mcp_error(e: AppError) -> McpError {
        if e.is_user_facing() {
            McpError::invalid_params(format!("{e}"), None)
        } else {
            tracing::error!(error = %e, "tool call failed");
            McpError::internal_error(format!("{e}"), None)
        }
    }

    /// 書籍ID or 番号（`books` 出力の 1 始まり） → BookId に解決する。
    ///
    /// 数字だけのIDを持つ書籍もあるため、カタログにIDとして一致するものを優先する。
    async fn resolve_book_ref(&self, book_ref: &str) -> Result<BookId, McpError> {
        let book_ref = book_ref.trim();
        if book_ref.is_empty() {
            return Err(McpError::invalid_params("book must not be empty", None));
        }

        let Ok(num) = book_ref.parse::<usize>() else {
            return Ok(BookId::from(book_ref));
        };

        let books = self
            .library
            .catalog()
            .list_books()
            .await
            .map_err(Self::to_mcp_error)?;
        if let Some(book) = books.iter().find(|b| b.id().as_str() == book_ref) {
            return Ok(book.id().clone());
        }
        if num == 0 || num > books.len() {
            return Err(McpError::invalid_params(
                format!(
                    "Book number {} out of range (1-{}) and no book has id '{}'. Use `books` to see the catalog.",
                    num,
                    books.len(),
                    book_ref
                ),
                None,
            ));
        }
        Ok(books[num - 1].id().clone())
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for BookshelfMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bookshelf-mcp".to_string(),
                title: Some("Bookshelf MCP — Catalog & Borrow Ledger".to_string()),
                description: Some(
                    "Browse a book catalog and borrow up to 3 books at a time. \
                     Workflow: `books` → pick number → `book_detail` / `borrow`."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Browse the catalog and manage borrowed books.\n\
                 \n\
                 At most 3 books can be borrowed at once, and a book cannot be borrowed twice.\n\
                 \n\
                 Tools: `books` → `book_detail` → `borrow` / `return_book`. \
                 `borrowed` lists what is currently held."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBooksRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookRequest {
    #[schemars(
        description = "Book to target: number from `books` output (e.g. '2') or a book ID"
    )]
    pub book: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBorrowedRequest {}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl BookshelfMcpServer {
    #[tool(
        name = "books",
        description = "List the book catalog with numbered entries. Borrowed books are marked. Use the numbers with `book_detail`, `borrow`, and `return_book`.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn books(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpBooksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let (books, borrowed) = tokio::join!(
            self.library.catalog().list_books(),
            self.library.ledger().borrowed_set()
        );
        let books = books.map_err(Self::to_mcp_error)?;
        let borrowed = borrowed.map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            render_catalog(&books, &borrowed),
        )]))
    }

    #[tool(
        name = "book_detail",
        description = "Show one book: author, rating, summary, cover, and whether it is currently borrowed.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_detail(
        &self,
        Parameters(req): Parameters<McpBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let book_id = self.resolve_book_ref(&req.book).await?;
        let detail = self
            .library
            .detail()
            .book_detail(&book_id)
            .await
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            render_detail(&detail),
        )]))
    }

    #[tool(
        name = "borrow",
        description = "Borrow a book. Fails if the book is already borrowed or 3 books are already held.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn borrow_book(
        &self,
        Parameters(req): Parameters<McpBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let book_id = self.resolve_book_ref(&req.book).await?;
        let record = self
            .library
            .ledger()
            .checkout(&book_id)
            .await
            .map_err(Self::to_mcp_error)?;
        let held = self
            .library
            .ledger()
            .borrowed_set()
            .await
            .map_err(Self::to_mcp_error)?
            .len();

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Borrowed: {} (record {}). Holding {}/{}.",
            book_id,
            record.id().short(),
            held,
            MAX_BORROWED
        ))]))
    }

    #[tool(
        name = "return_book",
        description = "Return a borrowed book. Fails if there is no borrow record for it.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn return_book(
        &self,
        Parameters(req): Parameters<McpBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let book_id = self.resolve_book_ref(&req.book).await?;
        let record = self
            .library
            .ledger()
            .check_in(&book_id)
            .await
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Returned: {} (record {}).",
            book_id,
            record.id().short()
        ))]))
    }

    #[tool(
        name = "borrowed",
        description = "List the books currently borrowed, with title and author.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn borrowed(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpBorrowedRequest>,
    ) -> Result<CallToolResult, McpError> {
        let list = self
            .library
            .detail()
            .borrowed_books()
            .await
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            render_borrowed(&list),
        )]))
    }
}

// =============================================================================
// Tests
// =============================================================================
