use futures::FutureExt;
use futures::StreamExt;

/// Where uploaded demo files live until the external parser reads them.
///
/// `fetch` hands back a local filesystem path because the parser is a child
/// process that takes a file argument.
pub trait DemoStorage: Send + Sync {
    fn duplicate(&self) -> Box<dyn DemoStorage>;

    fn upload<'f, 's, 'own>(
        &'own self,
        upload_id: String,
        stream: futures_util::stream::BoxStream<'s, axum::body::Bytes>,
    ) -> futures::future::BoxFuture<'f, Result<(), String>>
    where
        's: 'f,
        'own: 'f;

    fn fetch<'f, 'own>(
        &'own self,
        upload_id: String,
    ) -> futures::future::BoxFuture<'f, Result<std::path::PathBuf, String>>
    where
        'own: 'f;
}

pub struct FileStorage {
    folder: std::sync::Arc<std::path::PathBuf>,
}

impl FileStorage {
    pub fn new<P>(folder: P) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        Self {
            folder: std::sync::Arc::new(folder.into()),
        }
    }
}

impl DemoStorage for FileStorage {
    fn duplicate(&self) -> Box<dyn DemoStorage> {
        Box::new(Self {
            folder: self.folder.clone(),
        })
    }

    fn upload<'f, 's, 'own>(
        &'own self,
        upload_id: String,
        stream: futures_util::stream::BoxStream<'s, axum::body::Bytes>,
    ) -> futures::future::BoxFuture<'f, Result<(), String>>
    where
        's: 'f,
        'own: 'f,
    {
        let path = self.folder.clone();

        async move {
            if !tokio::fs::try_exists(path.as_path()).await.unwrap_or(false) {
                tokio::fs::create_dir_all(path.as_path())
                    .await
                    .map_err(|err| err.to_string())?;
            }

            let demo_file_path = path.join(format!("{}.dem", upload_id));

            async {
                // Convert the stream into an `AsyncRead`.
                let body_with_io_error = stream.map(|b| Ok::<_, std::io::Error>(b));
                let body_reader = tokio_util::io::StreamReader::new(body_with_io_error);
                futures::pin_mut!(body_reader);

                let mut file =
                    tokio::io::BufWriter::new(tokio::fs::File::create(demo_file_path).await?);

                tokio::io::copy(&mut body_reader, &mut file).await?;

                Ok::<_, std::io::Error>(())
            }
            .await
            .map_err(|err| err.to_string())
        }
        .boxed()
    }

    fn fetch<'f, 'own>(
        &'own self,
        upload_id: String,
    ) -> futures::future::BoxFuture<'f, Result<std::path::PathBuf, String>>
    where
        'own: 'f,
    {
        async move {
            let demo_file_path = self.folder.join(format!("{}.dem", upload_id));

            if !tokio::fs::try_exists(&demo_file_path).await.unwrap_or(false) {
                return Err(format!("no stored demo for upload {}", upload_id));
            }

            Ok(demo_file_path)
        }
        .boxed()
    }
}

pub struct S3Storage {
    bucket: std::sync::Arc<s3::Bucket>,
    /// Demos are spooled here before being handed to the parser process.
    spool: std::sync::Arc<std::path::PathBuf>,
}

impl S3Storage {
    pub fn new<P>(
        bucket_name: &str,
        region: s3::region::Region,
        credentials: s3::creds::Credentials,
        spool: P,
    ) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        let mut bucket = s3::bucket::Bucket::new(bucket_name, region, credentials).unwrap();
        bucket.set_path_style();

        Self {
            bucket: bucket.into(),
            spool: std::sync::Arc::new(spool.into()),
        }
    }
}

impl DemoStorage for S3Storage {
    fn duplicate(&self) -> Box<dyn DemoStorage> {
        Box::new(Self {
            bucket: self.bucket.clone(),
            spool: self.spool.clone(),
        })
    }

    fn upload<'f, 's, 'own>(
        &'own self,
        upload_id: String,
        stream: futures_util::stream::BoxStream<'s, axum::body::Bytes>,
    ) -> futures::future::BoxFuture<'f, Result<(), String>>
    where
        's: 'f,
        'own: 'f,
    {
        async move {
            // Convert the stream into an `AsyncRead`.
            let body_with_io_error = stream.map(|b| Ok::<_, std::io::Error>(b));
            let body_reader = tokio_util::io::StreamReader::new(body_with_io_error);
            futures::pin_mut!(body_reader);

            self.bucket
                .put_object_stream(&mut body_reader, &upload_id)
                .await
                .map_err(|e| format!("Uploading Stream to bucket: {:?}", e))?;

            Ok(())
        }
        .boxed()
    }

    fn fetch<'f, 'own>(
        &'own self,
        upload_id: String,
    ) -> futures::future::BoxFuture<'f, Result<std::path::PathBuf, String>>
    where
        'own: 'f,
    {
        async move {
            let resp = self
                .bucket
                .get_object(&upload_id)
                .await
                .map_err(|e| format!("Loading from Bucket: {:?}", e))?;

            if !tokio::fs::try_exists(self.spool.as_path())
                .await
                .unwrap_or(false)
            {
                tokio::fs::create_dir_all(self.spool.as_path())
                    .await
                    .map_err(|err| err.to_string())?;
            }

            let demo_file_path = self.spool.join(format!("{}.dem", upload_id));
            tokio::fs::write(&demo_file_path, resp.to_vec())
                .await
                .map_err(|err| err.to_string())?;

            Ok(demo_file_path)
        }
        .boxed()
    }
}
