mod search_flow;
mod workbook_files;
