//! HTML pages.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use vgif_media::DOWNLOAD_FILE_NAME;

/// Upload form served on `/`.
pub const UPLOAD_FORM_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Video to GIF Converter</title>
    <script src="https://cdn.tailwindcss.com"></script>
  </head>
  <body class="bg-gray-900 text-white flex items-center justify-center min-h-screen">
    <div class="p-6 bg-gray-800 bg-opacity-60 rounded-lg shadow-lg text-center">
      <h1 class="text-4xl font-bold mb-4">Upload Video File</h1>
      <form enctype="multipart/form-data" action="/upload" method="post" class="space-y-4">
        <input class="block w-full text-white bg-gray-700 rounded-md p-2" type="file" name="video" accept="video/*">
        <br>
        <input class="px-4 py-2 bg-blue-600 hover:bg-blue-700 rounded-md cursor-pointer" type="submit" value="Convert to GIF">
      </form>
    </div>
  </body>
</html>
"#;

/// Base64 data URI for GIF bytes.
pub fn gif_data_uri(gif: &[u8]) -> String {
    format!("data:image/gif;base64,{}", STANDARD.encode(gif))
}

/// Result page showing the GIF inline and offering it as a download.
///
/// The same data URI backs both the `<img>` and the download link.
pub fn result_page(gif: &[u8]) -> String {
    let data_uri = gif_data_uri(gif);
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>GIF Result</title>
    <script src="https://cdn.tailwindcss.com"></script>
  </head>
  <body class="bg-gray-900 text-white flex flex-col items-center justify-center min-h-screen">
    <h1 class="text-4xl font-bold mb-4">GIF Result</h1>
    <img src="{uri}" alt="Generated GIF" class="border-4 border-blue-600 rounded-md mb-4">
    <a href="{uri}" download="{download}" class="px-4 py-2 bg-blue-600 hover:bg-blue-700 rounded-md cursor-pointer mb-4">Download GIF</a>
    <a href="/" class="px-4 py-2 bg-gray-600 hover:bg-gray-700 rounded-md cursor-pointer">Back to Upload</a>
  </body>
</html>
"#,
        uri = data_uri,
        download = DOWNLOAD_FILE_NAME,
    )
}
